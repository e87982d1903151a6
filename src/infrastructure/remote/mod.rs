//! Remote embedding store implementations

mod disabled;
mod factory;
mod http_client;
mod supabase;

pub use disabled::DisabledRemoteStore;
pub use factory::{RemoteStoreConfig, RemoteStoreFactory};
pub use http_client::{HttpClient, HttpClientTrait};
pub use supabase::{SupabaseConfig, SupabaseEmbeddingStore};
