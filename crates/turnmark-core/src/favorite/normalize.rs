//! Defensive decoding of persisted favorite records.
//!
//! A record is only dropped when it has no usable `conversationId`; an item
//! only when it has no usable `nodeIndex`. Every other field falls back to a
//! default, so one bad value never costs the rest of the record.

use super::model::{FavoriteConversation, FavoriteItem};
use serde_json::Value;
use std::collections::HashSet;

/// Decodes the stored favorites collection.
///
/// Anything that is not an array decodes to an empty list. Only the first
/// record of each conversation is kept.
pub fn normalize_records(value: &Value) -> Vec<FavoriteConversation> {
    let Some(entries) = value.as_array() else {
        tracing::warn!("Stored favorites are not a list, ignoring them");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    entries
        .iter()
        .filter_map(|entry| {
            let record = normalize_record(entry);
            if record.is_none() {
                tracing::warn!("Skipping favorite record without a conversation id");
            }
            record
        })
        .filter(|record| seen.insert(record.conversation_id.clone()))
        .collect()
}

/// Decodes one record. Requires a non-blank string `conversationId`.
pub fn normalize_record(value: &Value) -> Option<FavoriteConversation> {
    let object = value.as_object()?;
    let conversation_id = object
        .get("conversationId")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())?;

    let updated_at = timestamp(object.get("updatedAt")).unwrap_or(0);
    let items = object
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| normalize_item(item, updated_at))
                .collect()
        })
        .unwrap_or_default();

    Some(FavoriteConversation {
        conversation_id: conversation_id.to_string(),
        url: text(object.get("url")),
        title: text(object.get("title")),
        site_name: text(object.get("siteName")),
        items,
        updated_at,
    })
}

/// Decodes one item, stamping it with `fallback_timestamp` when its own
/// timestamp is missing or unusable.
pub fn normalize_item(value: &Value, fallback_timestamp: i64) -> Option<FavoriteItem> {
    let object = value.as_object()?;
    Some(FavoriteItem {
        node_index: node_index(object.get("nodeIndex"))?,
        prompt_text: text(object.get("promptText")),
        timestamp: timestamp(object.get("timestamp")).unwrap_or(fallback_timestamp),
    })
}

/// A finite, non-negative number within `u32`; fractions are truncated.
pub(crate) fn node_index(value: Option<&Value>) -> Option<u32> {
    let index = value?.as_f64()?;
    if !index.is_finite() || index < 0.0 || index > f64::from(u32::MAX) {
        return None;
    }
    Some(index as u32)
}

/// Milliseconds since the epoch, from an integer or a finite float.
pub(crate) fn timestamp(value: Option<&Value>) -> Option<i64> {
    let value = value?;
    if let Some(millis) = value.as_i64() {
        return Some(millis);
    }
    value
        .as_f64()
        .filter(|millis| millis.is_finite())
        .map(|millis| millis as i64)
}

fn text(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bad_item_fields_do_not_drop_the_record() {
        let value = json!([{
            "conversationId": "c1",
            "title": null,
            "updatedAt": 50,
            "items": [
                { "nodeIndex": 1, "promptText": null },
                { "nodeIndex": -1, "promptText": "negative" },
                { "nodeIndex": 2.7, "promptText": "fraction", "timestamp": "yesterday" },
                { "promptText": "no index" },
                "not an item"
            ]
        }]);

        let records = normalize_records(&value);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.title, "");
        assert_eq!(
            record.items,
            vec![
                FavoriteItem {
                    node_index: 1,
                    prompt_text: String::new(),
                    timestamp: 50,
                },
                FavoriteItem {
                    node_index: 2,
                    prompt_text: "fraction".to_string(),
                    timestamp: 50,
                },
            ]
        );
    }

    #[test]
    fn test_records_without_id_are_dropped_and_duplicates_collapsed() {
        let value = json!([
            { "title": "missing id" },
            { "conversationId": "  " },
            { "conversationId": 7 },
            42,
            { "conversationId": "c1", "title": "first", "items": "nope" },
            { "conversationId": "c1", "title": "duplicate" }
        ]);

        let records = normalize_records(&value);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "first");
        assert!(records[0].items.is_empty());
    }

    #[test]
    fn test_well_formed_records_decode_unchanged() {
        let record = FavoriteConversation {
            conversation_id: "c1".to_string(),
            url: "https://chat.example/c/c1".to_string(),
            title: "Hello".to_string(),
            site_name: "Example".to_string(),
            items: vec![FavoriteItem {
                node_index: 3,
                prompt_text: "x".to_string(),
                timestamp: 10,
            }],
            updated_at: 11,
        };
        let value = serde_json::to_value(vec![record.clone()]).unwrap();
        assert_eq!(normalize_records(&value), vec![record]);
    }

    #[test]
    fn test_non_list_decodes_empty() {
        assert!(normalize_records(&json!({ "c1": {} })).is_empty());
        assert!(normalize_records(&json!(null)).is_empty());
    }
}
