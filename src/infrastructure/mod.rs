//! Infrastructure layer - External service implementations

pub mod dataset;
pub mod key_value;
pub mod logging;
pub mod remote;
pub mod services;
