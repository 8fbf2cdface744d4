use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default distance from the document bottom, in pixels, inside which the
/// last turn is always selected.
pub const DEFAULT_BOTTOM_SNAP_THRESHOLD_PX: f64 = 200.0;

/// Default maximum number of characters kept in a favorite title.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 40;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct TurnmarkConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub navigation: NavigationSettings,
    #[serde(default)]
    pub favorites: FavoriteSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Keys used in the key-value store. Each store owns a disjoint key space.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StorageSettings {
    #[serde(default = "default_pinned_prefix")]
    pub pinned_prefix: String,
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
    #[serde(default = "default_archive_key")]
    pub archive_key: String,
    /// Overrides the directory used by the JSON file store.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            pinned_prefix: default_pinned_prefix(),
            favorites_key: default_favorites_key(),
            archive_key: default_archive_key(),
            data_dir: None,
        }
    }
}

fn default_pinned_prefix() -> String {
    "pinned".to_string()
}

fn default_favorites_key() -> String {
    "favorites".to_string()
}

fn default_archive_key() -> String {
    "favorites-archive".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NavigationSettings {
    #[serde(default = "default_bottom_snap_threshold")]
    pub bottom_snap_threshold_px: f64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            bottom_snap_threshold_px: DEFAULT_BOTTOM_SNAP_THRESHOLD_PX,
        }
    }
}

fn default_bottom_snap_threshold() -> f64 {
    DEFAULT_BOTTOM_SNAP_THRESHOLD_PX
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FavoriteSettings {
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
    /// Name given to archive folders created or loaded without one.
    #[serde(default = "default_folder_name")]
    pub default_folder_name: String,
}

impl Default for FavoriteSettings {
    fn default() -> Self {
        Self {
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            default_folder_name: default_folder_name(),
        }
    }
}

fn default_title_max_chars() -> usize {
    DEFAULT_TITLE_MAX_CHARS
}

fn default_folder_name() -> String {
    crate::archive::DEFAULT_FOLDER_NAME.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
