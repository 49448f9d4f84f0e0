//! Chat backend adapters.

pub mod http;
pub mod types;
