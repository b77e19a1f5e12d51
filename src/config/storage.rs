//! Local snapshot store settings.

use serde::Deserialize;
use std::path::PathBuf;

/// Key the snapshot is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "reminder-me-transactions";

/// Where the local key-value store keeps its files.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per key
    pub dir: PathBuf,
    /// Key of the transaction snapshot
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}
