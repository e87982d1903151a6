//! Key-value infrastructure - Persisted store implementations

mod factory;
mod file;
mod in_memory;
mod redis;

pub use factory::{KeyValueStoreConfig, KeyValueStoreFactory, KeyValueStoreType};
pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
pub use redis::{RedisKeyValueStore, RedisKeyValueStoreConfig};
