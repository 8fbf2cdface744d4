//! Unified path management for turnmark files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/turnmark/          # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/turnmark/     # Data directory
//! └── store/                   # JSON key-value store, one file per key
//!     ├── favorites.json
//!     ├── favorites-archive.json
//!     └── pinned%3A<conversation>.json
//! ```

use std::path::{Path, PathBuf};
use turnmark_core::error::{Result, TurnmarkError};

const APP_DIR: &str = "turnmark";
const CONFIG_FILE: &str = "config.toml";
const STORE_DIR: &str = "store";

/// Resolves turnmark's config and data locations.
///
/// With a base directory (tests, portable installs) everything lives under
/// it; otherwise the platform config/data directories are used.
#[derive(Debug, Clone, Default)]
pub struct TurnmarkPaths {
    base_dir: Option<PathBuf>,
}

impl TurnmarkPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the turnmark configuration directory.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error when the platform config directory cannot be
    /// determined.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.join("config"));
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| TurnmarkError::config("Cannot find config directory"))
    }

    /// Returns the turnmark data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_dir {
            return Ok(base.join("data"));
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| TurnmarkError::config("Cannot find data directory"))
    }

    /// Path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join(CONFIG_FILE))
    }

    /// Directory backing the JSON key-value store.
    pub fn store_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(STORE_DIR))
    }
}
