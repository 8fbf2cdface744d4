//! Persistence of the favorite archive tree.

use std::sync::Arc;
use turnmark_core::archive::{ArchiveState, DEFAULT_FOLDER_NAME, normalize_state_with};
use turnmark_core::error::Result;
use turnmark_core::storage::KeyValueStore;

/// Loads and saves the whole [`ArchiveState`] under one key.
///
/// Stored data is normalized on every load, so hand-edited or legacy values
/// never reach the tree operations.
#[derive(Clone)]
pub struct ArchiveStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    default_folder_name: String,
}

impl ArchiveStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            default_folder_name: DEFAULT_FOLDER_NAME.to_string(),
        }
    }

    /// Name given to stored folders that have none.
    pub fn with_default_folder_name(mut self, name: impl Into<String>) -> Self {
        self.default_folder_name = name.into();
        self
    }

    pub fn default_folder_name(&self) -> &str {
        &self.default_folder_name
    }

    /// Loads the archive. Missing, unreadable or malformed data yields an
    /// empty archive.
    pub async fn load(&self) -> ArchiveState {
        match self.try_load().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to load archive: {}", e);
                ArchiveState::new()
            }
        }
    }

    /// Loads the archive, surfacing backend failures. Stored data is still
    /// normalized.
    pub async fn try_load(&self) -> Result<ArchiveState> {
        Ok(match self.store.get(&self.key).await? {
            Some(value) => normalize_state_with(&value, &self.default_folder_name),
            None => ArchiveState::new(),
        })
    }

    pub async fn save(&self, state: &ArchiveState) -> Result<()> {
        self.store.set(&self.key, state.to_value()?).await
    }

    /// Loads the archive, applies `f` and saves when `f` reports a change.
    ///
    /// A failed read is returned as an error before `f` runs, so an
    /// unreadable archive is never replaced.
    ///
    /// # Returns
    ///
    /// What `f` returned.
    pub async fn mutate<F>(&self, f: F) -> Result<bool>
    where
        F: FnOnce(&mut ArchiveState) -> bool,
    {
        let mut state = self.try_load().await?;
        if !f(&mut state) {
            return Ok(false);
        }
        self.save(&state).await?;
        Ok(true)
    }
}
