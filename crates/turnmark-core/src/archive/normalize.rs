//! Defensive decoding of persisted archive data.
//!
//! Stored archives may come from older builds or be partially corrupted.
//! Nothing here fails: every field is validated on its own and replaced by a
//! default when it is missing or has the wrong type.

use super::model::{ArchiveState, DEFAULT_FOLDER_NAME};
use super::snapshot::{ArchiveSnapshot, FolderNode};
use crate::favorite::FavoriteLink;
use crate::favorite::normalize::{node_index, timestamp};
use crate::time::now_millis;
use serde_json::Value;

/// Decodes an archive from arbitrary JSON.
///
/// Anything that is not an object with a `rootFolders` array decodes to an
/// empty archive.
pub fn normalize_state(value: &Value) -> ArchiveState {
    normalize_state_with(value, DEFAULT_FOLDER_NAME)
}

/// Same as [`normalize_state`], naming unnamed folders `default_name`.
pub fn normalize_state_with(value: &Value, default_name: &str) -> ArchiveState {
    let now = now_millis();
    let root_folders = value
        .get("rootFolders")
        .and_then(Value::as_array)
        .map(|folders| {
            folders
                .iter()
                .filter_map(|folder| decode_folder(folder, default_name, now))
                .collect()
        })
        .unwrap_or_default();

    ArchiveState::from_snapshot(ArchiveSnapshot {
        root_folders,
        ..ArchiveSnapshot::default()
    })
}

/// Decodes one folder (and its subtree) from arbitrary JSON.
///
/// Returns `None` only when `value` is not an object.
pub fn normalize_folder(value: &Value) -> Option<FolderNode> {
    decode_folder(value, DEFAULT_FOLDER_NAME, now_millis())
}

/// Decodes one link. Requires a string `conversationId` and a finite,
/// non-negative numeric `nodeIndex`; fractional indexes are truncated.
pub fn normalize_link(value: &Value) -> Option<FavoriteLink> {
    let conversation_id = value.get("conversationId")?.as_str()?;
    let index = node_index(value.get("nodeIndex"))?;
    Some(FavoriteLink::new(conversation_id, index))
}

fn decode_folder(value: &Value, default_name: &str, now: i64) -> Option<FolderNode> {
    let object = value.as_object()?;

    let id = match object.get("id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    let name = match object.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => default_name.to_string(),
    };

    let folders = object
        .get("folders")
        .and_then(Value::as_array)
        .map(|children| {
            children
                .iter()
                .filter_map(|child| decode_folder(child, default_name, now))
                .collect()
        })
        .unwrap_or_default();

    let links: Vec<FavoriteLink> = object
        .get("links")
        .and_then(Value::as_array)
        .map(|links| links.iter().filter_map(normalize_link).collect())
        .unwrap_or_default();

    let created_at = timestamp(object.get("createdAt")).unwrap_or(now);
    let updated_at = timestamp(object.get("updatedAt")).unwrap_or(created_at);

    Some(FolderNode {
        id,
        name,
        folders,
        links,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_garbage_input_yields_empty_state() {
        for garbage in [
            json!(null),
            json!(42),
            json!("archive"),
            json!([1, 2, 3]),
            json!({}),
            json!({ "version": 1, "rootFolders": "nope" }),
        ] {
            let state = normalize_state(&garbage);
            assert!(state.is_empty(), "input: {}", garbage);
            assert_eq!(state.to_snapshot(), ArchiveSnapshot::default());
        }
    }

    #[test]
    fn test_json_round_trip_reproduces_tree() {
        let mut state = ArchiveState::new();
        let a = state.create_folder(None, "Work").id.clone();
        let a1 = state.create_folder(Some(&a), "Drafts").id.clone();
        state.create_folder(None, "Personal");
        state.add_link_to_folder(&a, &FavoriteLink::new("c1", 2));
        state.add_link_to_folder(&a1, &FavoriteLink::new("c2", 0));

        let text = serde_json::to_string(&state.to_value().unwrap()).unwrap();
        let restored = normalize_state(&serde_json::from_str(&text).unwrap());

        assert_eq!(restored, state);
    }

    #[test]
    fn test_missing_fields_are_synthesized() {
        let value = json!({
            "version": 1,
            "rootFolders": [
                { "links": "not-an-array", "folders": 7 },
                { "id": "", "name": "  " },
                "not a folder"
            ]
        });
        let state = normalize_state(&value);
        assert_eq!(state.folder_count(), 2);
        for folder in state.root_folders() {
            assert!(!folder.id.is_empty());
            assert_eq!(folder.name, DEFAULT_FOLDER_NAME);
            assert!(folder.links.is_empty());
            assert!(folder.children.is_empty());
        }
    }

    #[test]
    fn test_custom_default_name() {
        let state = normalize_state_with(&json!({ "rootFolders": [{}] }), "Inbox");
        assert_eq!(state.root_folders()[0].name, "Inbox");
    }

    #[test]
    fn test_malformed_links_are_dropped() {
        let value = json!({
            "rootFolders": [{
                "id": "f",
                "name": "F",
                "links": [
                    { "conversationId": "c1", "nodeIndex": 1 },
                    { "conversationId": 5, "nodeIndex": 1 },
                    { "conversationId": "c1", "nodeIndex": "2" },
                    { "conversationId": "c1" },
                    { "conversationId": "c1", "nodeIndex": -1 },
                    { "conversationId": "c2", "nodeIndex": 3.0 },
                    null
                ]
            }]
        });
        let state = normalize_state(&value);
        let folder = state.find_folder("f").unwrap();
        assert_eq!(
            folder.links,
            vec![FavoriteLink::new("c1", 1), FavoriteLink::new("c2", 3)]
        );
    }

    #[test]
    fn test_nested_folders_are_decoded() {
        let value = json!({
            "version": 1,
            "rootFolders": [{
                "id": "root",
                "name": "Root",
                "createdAt": 10,
                "updatedAt": 20,
                "folders": [{ "id": "child", "name": "Child", "createdAt": 11 }]
            }]
        });
        let state = normalize_state(&value);
        let child = state.find_folder("child").unwrap();
        assert_eq!(child.parent_id.as_deref(), Some("root"));
        assert_eq!(child.created_at, 11);
        assert_eq!(child.updated_at, 11);
        assert_eq!(state.find_folder("root").unwrap().updated_at, 20);
    }

    #[test]
    fn test_normalize_folder_rejects_non_objects() {
        assert!(normalize_folder(&json!([])).is_none());
        let node = normalize_folder(&json!({ "name": "Solo" })).unwrap();
        assert_eq!(node.name, "Solo");
        assert!(node.folders.is_empty());
    }
}
