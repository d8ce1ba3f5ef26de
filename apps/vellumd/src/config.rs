//! Daemon configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the per-collection JSON files.
    pub store_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            store_dir: env::var("STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
        }
    }
}
