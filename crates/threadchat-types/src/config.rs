//! Configuration types for threadchat.
//!
//! `AppConfig` represents the `threadchat.toml` file that controls the
//! listen address, the database location and the chat backend endpoint.

use serde::{Deserialize, Serialize};

/// Lower bound for the backend request timeout, in seconds.
pub const MIN_BACKEND_TIMEOUT_SECS: u64 = 1;

/// Upper bound for the backend request timeout, in seconds.
pub const MAX_BACKEND_TIMEOUT_SECS: u64 = 120;

/// Top-level configuration.
///
/// Loaded from `~/.threadchat/threadchat.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite URL. When unset, a database inside the data directory is used.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

/// HTTP listen address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Remote chat backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base address; the chat endpoint is `{base_url}/api/chat`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bound on the whole request (connect + response), in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// The configured timeout clamped to the supported range.
    pub fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs
            .clamp(MIN_BACKEND_TIMEOUT_SECS, MAX_BACKEND_TIMEOUT_SECS)
    }
}
