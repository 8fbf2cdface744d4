//! Favorite conversation records, persisted as one collection.

use std::collections::HashSet;
use std::sync::Arc;
use turnmark_core::config::DEFAULT_TITLE_MAX_CHARS;
use turnmark_core::error::Result;
use turnmark_core::favorite::{
    FavoriteConversation, FavoriteItem, FavoriteItemDraft, FavoriteLink, normalize_records,
    truncate_title,
};
use turnmark_core::storage::KeyValueStore;
use turnmark_core::time::now_millis;

/// Title used when neither a chat title nor any prompt text is available.
pub const UNTITLED: &str = "Untitled";

/// Stores every [`FavoriteConversation`] under a single key.
///
/// Each operation is one whole-collection load, mutate, save. There is no
/// locking: two operations interleaving across their awaits can lose an
/// update, even when they touch different conversations.
///
/// Writes refuse to run on top of a failed read, so an unreadable
/// collection is never overwritten. Plain reads degrade to empty.
#[derive(Clone)]
pub struct FavoriteStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    title_max_chars: usize,
}

impl FavoriteStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
        }
    }

    pub fn with_title_max_chars(mut self, title_max_chars: usize) -> Self {
        self.title_max_chars = title_max_chars;
        self
    }

    /// Loads every record, treating any read failure as "no favorites".
    pub async fn load_all(&self) -> Vec<FavoriteConversation> {
        match self.try_load_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to load favorites: {}", e);
                Vec::new()
            }
        }
    }

    /// Loads every record, surfacing backend failures.
    ///
    /// Stored data is normalized field by field: malformed values fall back
    /// to defaults, and only records without a conversation id or items
    /// without a node index are dropped.
    pub async fn try_load_all(&self) -> Result<Vec<FavoriteConversation>> {
        let Some(value) = self.store.get(&self.key).await? else {
            return Ok(Vec::new());
        };
        Ok(normalize_records(&value))
    }

    /// Replaces the whole collection.
    pub async fn save_all(&self, records: &[FavoriteConversation]) -> Result<()> {
        let value = serde_json::to_value(records)?;
        self.store.set(&self.key, value).await
    }

    pub async fn get(&self, conversation_id: &str) -> Option<FavoriteConversation> {
        self.load_all()
            .await
            .into_iter()
            .find(|record| record.conversation_id == conversation_id)
    }

    pub async fn is_favorited(&self, conversation_id: &str) -> bool {
        self.get(conversation_id).await.is_some()
    }

    /// Creates or replaces the record of a conversation.
    ///
    /// The title is `chat_title`, or the first item's prompt when the chat
    /// title is blank, truncated to the configured length. Items are stamped
    /// with the current time. New records go to the front of the list.
    pub async fn favorite_conversation(
        &self,
        conversation_id: &str,
        url: &str,
        site_name: &str,
        chat_title: &str,
        items: Vec<FavoriteItemDraft>,
    ) -> Result<FavoriteConversation> {
        let now = now_millis();
        let title = self.derive_title(chat_title, &items);
        let record = FavoriteConversation {
            conversation_id: conversation_id.to_string(),
            url: url.to_string(),
            title,
            site_name: site_name.to_string(),
            items: items.into_iter().map(|item| item.stamp(now)).collect(),
            updated_at: now,
        };

        let mut records = self.try_load_all().await?;
        match records
            .iter_mut()
            .find(|r| r.conversation_id == conversation_id)
        {
            Some(existing) => *existing = record.clone(),
            None => records.insert(0, record.clone()),
        }
        self.save_all(&records).await?;

        tracing::debug!(
            conversation_id,
            items = record.items.len(),
            "Conversation favorited"
        );
        Ok(record)
    }

    /// Replaces the items of an existing record.
    ///
    /// # Returns
    ///
    /// `false` when the conversation is not favorited.
    pub async fn update_favorite_items(
        &self,
        conversation_id: &str,
        items: Vec<FavoriteItem>,
    ) -> Result<bool> {
        self.modify(conversation_id, |record| {
            record.items = items;
            true
        })
        .await
    }

    /// Removes a conversation's record.
    pub async fn unfavorite_conversation(&self, conversation_id: &str) -> Result<bool> {
        let mut records = self.try_load_all().await?;
        let before = records.len();
        records.retain(|record| record.conversation_id != conversation_id);
        if records.len() == before {
            return Ok(false);
        }
        self.save_all(&records).await?;
        tracing::debug!(conversation_id, "Conversation unfavorited");
        Ok(true)
    }

    /// Sets a new title. A blank title is a no-op.
    pub async fn update_title(&self, conversation_id: &str, new_title: &str) -> Result<bool> {
        if new_title.trim().is_empty() {
            return Ok(false);
        }
        let title = truncate_title(new_title, self.title_max_chars);
        self.modify(conversation_id, |record| {
            record.title = title;
            true
        })
        .await
    }

    /// Drops one item from a record. The record itself always stays, even
    /// with no items left.
    ///
    /// # Returns
    ///
    /// `false` when the record or the item does not exist.
    pub async fn remove_item(&self, conversation_id: &str, node_index: u32) -> Result<bool> {
        self.modify(conversation_id, |record| {
            let before = record.items.len();
            record.items.retain(|item| item.node_index != node_index);
            record.items.len() != before
        })
        .await
    }

    /// Every favorite turn across all records.
    pub async fn links(&self) -> Vec<FavoriteLink> {
        self.load_all()
            .await
            .iter()
            .flat_map(|record| record.links().collect::<Vec<_>>())
            .collect()
    }

    /// Identity keys of every favorite turn, surfacing read failures.
    pub async fn existing_link_keys(&self) -> Result<HashSet<String>> {
        Ok(self
            .try_load_all()
            .await?
            .iter()
            .flat_map(|record| record.links().map(|link| link.key()).collect::<Vec<_>>())
            .collect())
    }

    /// Load, apply `f` to one record, and save when `f` reports a change.
    /// A changed record gets a fresh `updated_at`.
    async fn modify<F>(&self, conversation_id: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut FavoriteConversation) -> bool,
    {
        let mut records = self.try_load_all().await?;
        let Some(record) = records
            .iter_mut()
            .find(|r| r.conversation_id == conversation_id)
        else {
            return Ok(false);
        };
        if !f(record) {
            return Ok(false);
        }
        record.updated_at = now_millis();
        self.save_all(&records).await?;
        Ok(true)
    }

    fn derive_title(&self, chat_title: &str, items: &[FavoriteItemDraft]) -> String {
        let source = Some(chat_title)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                items
                    .iter()
                    .map(|item| item.prompt_text.as_str())
                    .find(|t| !t.trim().is_empty())
            })
            .unwrap_or(UNTITLED);
        truncate_title(source, self.title_max_chars)
    }
}
