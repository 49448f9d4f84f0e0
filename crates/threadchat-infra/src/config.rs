//! Configuration loader for threadchat.
//!
//! Reads `threadchat.toml` from the data directory (`~/.threadchat/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to sensible
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use threadchat_types::config::AppConfig;

use crate::sqlite::pool::default_database_url;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "threadchat.toml";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority: `THREADCHAT_DATA_DIR`, then `~/.threadchat`, then `./.threadchat`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("THREADCHAT_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".threadchat");
    }

    PathBuf::from(".threadchat")
}

/// Load configuration from `{data_dir}/threadchat.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {CONFIG_FILE} found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// The database URL to open: explicit config wins over the data-dir default.
pub fn resolve_database_url(config: &AppConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir))
}
