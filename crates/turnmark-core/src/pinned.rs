//! Pinned turn marks.
//!
//! A pin is a payload-free flag on one turn. Pins for a conversation are a
//! set of turn ids (the turn index rendered as a string).

use serde_json::Value;
use std::collections::BTreeSet;

/// Pinned turn ids of one conversation.
pub type PinnedSet = BTreeSet<String>;

/// Store key for a conversation's pins: `"<prefix>:<conversation_id>"`.
pub fn pinned_key(prefix: &str, conversation_id: &str) -> String {
    format!("{}:{}", prefix, conversation_id)
}

/// Turn id used in the pinned set for a turn index.
pub fn turn_id(index: usize) -> String {
    index.to_string()
}

/// Decodes a stored pinned set.
///
/// Expects an array; string entries are kept and numeric entries are
/// converted to their string form. Anything else decodes to an empty set.
pub fn decode_pinned(value: &Value) -> PinnedSet {
    let Some(entries) = value.as_array() else {
        return PinnedSet::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(id) => Some(id.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

/// Encodes a pinned set as a JSON array of strings.
pub fn encode_pinned(set: &PinnedSet) -> Value {
    Value::Array(set.iter().cloned().map(Value::String).collect())
}
