//! Configuration service implementation.
//!
//! Loads [`TurnmarkConfig`] from `config.toml` in the turnmark config
//! directory and caches it.

use crate::paths::TurnmarkPaths;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use turnmark_core::config::TurnmarkConfig;
use turnmark_core::error::{Result, TurnmarkError};

/// Configuration service that loads and caches the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<TurnmarkConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &TurnmarkPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Reads the configuration file.
    ///
    /// # Returns
    ///
    /// - `Ok(config)`: parsed file, or defaults when the file is missing or empty
    /// - `Err(_)`: the file exists but cannot be read or parsed
    pub async fn load(&self) -> Result<TurnmarkConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(TurnmarkConfig::default());
            }
            Err(e) => {
                return Err(TurnmarkError::config(format!(
                    "Failed to read config file at {:?}: {}",
                    self.config_path, e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(TurnmarkConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            TurnmarkError::config(format!(
                "Failed to parse TOML from {:?}: {}",
                self.config_path, e
            ))
        })
    }

    /// Gets the configuration, loading it on first access.
    ///
    /// An unreadable file is logged and replaced by defaults.
    pub async fn get_config(&self) -> TurnmarkConfig {
        if let Some(cached) = self.config.read().await.as_ref() {
            return cached.clone();
        }

        let loaded = match self.load().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default configuration: {}", e);
                TurnmarkConfig::default()
            }
        };

        *self.config.write().await = Some(loaded.clone());
        loaded
    }

    /// Writes `config` to the configuration file and refreshes the cache.
    pub async fn save(&self, config: &TurnmarkConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let toml_string = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, toml_string).await?;

        *self.config.write().await = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        *self.config.write().await = None;
    }
}
