//! User configuration, loaded through confy
//!
//! All tunable values live here with sensible defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tidings_core::storage::DEFAULT_STORAGE_KEY;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the storage files
    pub data_directory: String,
    /// Storage key for the task list (file `<key>.json`)
    pub storage_key: String,
    /// Whether desktop notifications are permitted
    pub notifications_enabled: bool,
    /// Icon name or path shown with reminders (empty = none)
    pub notification_icon: String,
    /// Seconds between reminder scans
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let data_directory = ProjectDirs::from("", "", "tidings")
            .map(|dirs| dirs.data_dir().to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_directory,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            notifications_enabled: true,
            notification_icon: "appointment-soon".to_string(),
            poll_interval_secs: 60,
        }
    }
}

impl Config {
    pub fn icon(&self) -> Option<String> {
        let icon = self.notification_icon.trim();
        (!icon.is_empty()).then(|| icon.to_string())
    }
}
