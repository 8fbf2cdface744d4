//! Pinned turn marks, persisted per conversation.

use std::sync::Arc;
use turnmark_core::error::Result;
use turnmark_core::pinned::{PinnedSet, decode_pinned, encode_pinned, pinned_key};
use turnmark_core::storage::KeyValueStore;

/// Reads and writes the pinned set of each conversation under
/// `"<prefix>:<conversation_id>"`.
///
/// Pins are a convenience feature: read failures are logged and treated as
/// "nothing pinned".
#[derive(Clone)]
pub struct PinnedMarkStore {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl PinnedMarkStore {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Loads the pinned turn ids of a conversation. Never fails.
    pub async fn load_pinned(&self, conversation_id: &str) -> PinnedSet {
        match self.try_load_pinned(conversation_id).await {
            Ok(pinned) => pinned,
            Err(e) => {
                tracing::warn!(conversation_id, "Failed to load pinned marks: {}", e);
                PinnedSet::new()
            }
        }
    }

    /// Loads the pinned turn ids of a conversation, surfacing backend
    /// failures.
    pub async fn try_load_pinned(&self, conversation_id: &str) -> Result<PinnedSet> {
        let key = pinned_key(&self.prefix, conversation_id);
        Ok(match self.store.get(&key).await? {
            Some(value) => decode_pinned(&value),
            None => PinnedSet::new(),
        })
    }

    /// Replaces the pinned set of a conversation. An empty set removes the
    /// key.
    pub async fn save_pinned(&self, conversation_id: &str, pinned: &PinnedSet) -> Result<()> {
        let key = pinned_key(&self.prefix, conversation_id);
        if pinned.is_empty() {
            return self.store.remove(&key).await;
        }
        self.store.set(&key, encode_pinned(pinned)).await
    }

    /// Flips the pin on one turn. Fails without writing when the current
    /// pins cannot be read.
    ///
    /// # Returns
    ///
    /// Whether the turn is pinned after the call.
    pub async fn toggle_pinned(&self, conversation_id: &str, turn_id: &str) -> Result<bool> {
        let mut pinned = self.try_load_pinned(conversation_id).await?;
        let now_pinned = if pinned.remove(turn_id) {
            false
        } else {
            pinned.insert(turn_id.to_string());
            true
        };
        self.save_pinned(conversation_id, &pinned).await?;

        tracing::debug!(conversation_id, turn_id, pinned = now_pinned, "Pin toggled");
        Ok(now_pinned)
    }
}
