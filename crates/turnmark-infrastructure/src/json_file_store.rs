//! Directory of JSON files as a `KeyValueStore`.
//!
//! Each key maps to one pretty-printed JSON file. Writes go to a uniquely
//! named temporary file in the same directory, are fsynced, then atomically
//! renamed over the target, so readers never observe a half-written value.
//! Several stores may share a directory; the last rename wins.

use crate::paths::TurnmarkPaths;
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use turnmark_core::error::{Result, TurnmarkError};
use turnmark_core::storage::KeyValueStore;

/// JSON-file-per-key store.
///
/// Directory structure:
/// ```text
/// base_dir/
/// ├── favorites.json
/// ├── favorites-archive.json
/// └── pinned%3Aconversation-1.json
/// ```
#[derive(Clone)]
pub struct JsonFileKeyValueStore {
    base_dir: PathBuf,
    /// Serializes writers inside this process so temporary files never clash.
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileKeyValueStore {
    /// Opens (creating if needed) a store rooted at `base_dir`.
    pub async fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).await.map_err(|e| {
            TurnmarkError::io(format!(
                "Failed to create store directory {:?}: {}",
                base_dir, e
            ))
        })?;
        tracing::info!(dir = ?base_dir, "JSON key-value store opened");
        Ok(Self {
            base_dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Opens the store at the default data location.
    pub async fn default_location(paths: &TurnmarkPaths) -> Result<Self> {
        Self::new(paths.store_dir()?).await
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", encode_key(key)))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key);
        let tmp_path = temp_path(&path)?;
        let body = serde_json::to_string_pretty(&value)?;

        let _guard = self.write_lock.lock().await;

        let mut tmp_file = fs::File::create(&tmp_path).await?;
        tmp_file.write_all(body.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path).await.map_err(|e| {
            TurnmarkError::data_access(format!("Failed to write {:?}: {}", path, e))
        })?;

        tracing::debug!(key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9._-]` so any key becomes a
/// safe, reversible file name.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| TurnmarkError::io("Path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| TurnmarkError::io("Path has no file name"))?;
    Ok(parent.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    )))
}
