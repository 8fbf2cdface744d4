//! Favorite domain model.
//!
//! A favorite record bookmarks one conversation and carries the turns the
//! user marked in it. Archive folders reference those turns by
//! [`FavoriteLink`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker appended to titles cut at the maximum length.
pub const TITLE_ELLIPSIS: &str = "...";

/// One marked turn inside a favorite record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    /// Position of the turn in the conversation.
    pub node_index: u32,
    /// Prompt text, used only as a label.
    #[serde(default)]
    pub prompt_text: String,
    /// Milliseconds since the Unix epoch when the item was written.
    #[serde(default)]
    pub timestamp: i64,
}

/// A turn the caller wants to mark, before it is stamped with a write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteItemDraft {
    pub node_index: u32,
    pub prompt_text: String,
}

impl FavoriteItemDraft {
    pub fn new(node_index: u32, prompt_text: impl Into<String>) -> Self {
        Self {
            node_index,
            prompt_text: prompt_text.into(),
        }
    }

    pub fn stamp(self, timestamp: i64) -> FavoriteItem {
        FavoriteItem {
            node_index: self.node_index,
            prompt_text: self.prompt_text,
            timestamp,
        }
    }
}

/// Per-conversation bookmark record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteConversation {
    pub conversation_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub items: Vec<FavoriteItem>,
    #[serde(default)]
    pub updated_at: i64,
}

impl FavoriteConversation {
    /// Links for every item in this record.
    pub fn links(&self) -> impl Iterator<Item = FavoriteLink> + '_ {
        self.items
            .iter()
            .map(|item| FavoriteLink::new(self.conversation_id.clone(), item.node_index))
    }
}

/// Reference to one favorite turn: `(conversation_id, node_index)`.
///
/// Two links are the same turn if and only if their [`key`](Self::key)
/// matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteLink {
    pub conversation_id: String,
    pub node_index: u32,
}

impl FavoriteLink {
    pub fn new(conversation_id: impl Into<String>, node_index: u32) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            node_index,
        }
    }

    /// Identity key, `"<conversation_id>#<node_index>"`.
    pub fn key(&self) -> String {
        format!("{}#{}", self.conversation_id, self.node_index)
    }

    /// Parses an identity key back into a link.
    ///
    /// Splits on the last `#`, so conversation ids may contain `#`.
    pub fn from_key(key: &str) -> Option<Self> {
        let (conversation_id, index) = key.rsplit_once('#')?;
        let node_index = index.parse().ok()?;
        Some(Self::new(conversation_id, node_index))
    }
}

impl fmt::Display for FavoriteLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.conversation_id, self.node_index)
    }
}

/// Truncates `title` to `max_chars` characters, appending [`TITLE_ELLIPSIS`]
/// when anything was cut. Counts characters, not bytes.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let trimmed = title.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(max_chars).collect();
    truncated.push_str(TITLE_ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_key_format() {
        let link = FavoriteLink::new("c1", 2);
        assert_eq!(link.key(), "c1#2");
        assert_eq!(link.to_string(), "c1#2");
    }

    #[test]
    fn test_link_from_key_splits_on_last_hash() {
        assert_eq!(
            FavoriteLink::from_key("a#b#7"),
            Some(FavoriteLink::new("a#b", 7))
        );
        assert_eq!(FavoriteLink::from_key("no-index"), None);
        assert_eq!(FavoriteLink::from_key("c1#x"), None);
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("short", 40), "short");
        let long = "a".repeat(41);
        let truncated = truncate_title(&long, 40);
        assert_eq!(truncated, format!("{}...", "a".repeat(40)));
        assert_eq!(truncate_title(&"a".repeat(40), 40), "a".repeat(40));
    }

    #[test]
    fn test_truncate_title_counts_chars_not_bytes() {
        let title = "日本語のタイトル";
        assert_eq!(truncate_title(title, 3), "日本語...");
    }

    #[test]
    fn test_record_uses_camel_case_on_the_wire() {
        let record = FavoriteConversation {
            conversation_id: "c1".to_string(),
            url: "https://chat.example/c/c1".to_string(),
            title: "Hello".to_string(),
            site_name: "Example".to_string(),
            items: vec![FavoriteItem {
                node_index: 2,
                prompt_text: "x".to_string(),
                timestamp: 10,
            }],
            updated_at: 11,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["conversationId"], "c1");
        assert_eq!(value["siteName"], "Example");
        assert_eq!(value["items"][0]["nodeIndex"], 2);
        assert_eq!(value["items"][0]["promptText"], "x");
        assert_eq!(value["updatedAt"], 11);
    }
}
