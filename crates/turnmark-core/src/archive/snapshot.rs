//! Nested archive representation.
//!
//! This is the persisted JSON shape (`version` + `rootFolders`) and also the
//! resolved tree handed to a folder browser for rendering.

use super::model::{ARCHIVE_VERSION, ArchiveFolder, ArchiveState};
use crate::error::Result;
use crate::favorite::FavoriteLink;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSnapshot {
    pub version: u32,
    pub root_folders: Vec<FolderNode>,
}

impl Default for ArchiveSnapshot {
    fn default() -> Self {
        Self {
            version: ARCHIVE_VERSION,
            root_folders: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub folders: Vec<FolderNode>,
    pub links: Vec<FavoriteLink>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ArchiveState {
    /// Resolves the arena into the nested tree.
    pub fn to_snapshot(&self) -> ArchiveSnapshot {
        ArchiveSnapshot {
            version: ARCHIVE_VERSION,
            root_folders: self
                .root_ids
                .iter()
                .filter_map(|id| self.node_for(id, 0))
                .collect(),
        }
    }

    /// Serializes the archive into its persisted JSON shape.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.to_snapshot())?)
    }

    /// Builds an arena from a nested tree.
    ///
    /// Restores the arena invariants on untrusted input: a folder whose id
    /// was already taken gets a fresh one, and a link already placed in an
    /// earlier folder (depth-first order) is dropped.
    pub fn from_snapshot(snapshot: ArchiveSnapshot) -> Self {
        let mut state = ArchiveState::new();
        let mut seen_links = HashSet::new();
        for node in snapshot.root_folders {
            let id = state.insert_node(node, None, &mut seen_links);
            state.root_ids.push(id);
        }
        state
    }

    fn node_for(&self, id: &str, depth: usize) -> Option<FolderNode> {
        // Corrupt parent links could form a cycle; the arena can never be
        // deeper than its size.
        if depth > self.folders.len() {
            return None;
        }
        let folder = self.folders.get(id)?;
        Some(FolderNode {
            id: folder.id.clone(),
            name: folder.name.clone(),
            folders: folder
                .children
                .iter()
                .filter_map(|child| self.node_for(child, depth + 1))
                .collect(),
            links: folder.links.clone(),
            created_at: folder.created_at,
            updated_at: folder.updated_at,
        })
    }

    fn insert_node(
        &mut self,
        node: FolderNode,
        parent_id: Option<&str>,
        seen_links: &mut HashSet<String>,
    ) -> String {
        let id = if node.id.is_empty() || self.folders.contains_key(&node.id) {
            let fresh = uuid::Uuid::new_v4().to_string();
            tracing::warn!(
                original = %node.id,
                replacement = %fresh,
                "Archive folder id missing or duplicated, assigned a new one"
            );
            fresh
        } else {
            node.id
        };

        let links = node
            .links
            .into_iter()
            .filter(|link| seen_links.insert(link.key()))
            .collect();

        self.folders.insert(
            id.clone(),
            ArchiveFolder {
                id: id.clone(),
                name: node.name,
                parent_id: parent_id.map(str::to_string),
                children: Vec::new(),
                links,
                created_at: node.created_at,
                updated_at: node.updated_at,
            },
        );

        let mut children = Vec::new();
        for child in node.folders {
            children.push(self.insert_node(child, Some(&id), seen_links));
        }
        if let Some(folder) = self.folders.get_mut(&id) {
            folder.children = children;
        }

        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, folders: Vec<FolderNode>, links: Vec<FavoriteLink>) -> FolderNode {
        FolderNode {
            id: id.to_string(),
            name: format!("Folder {}", id),
            folders,
            links,
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn test_snapshot_round_trip_preserves_tree() {
        let snapshot = ArchiveSnapshot {
            version: 1,
            root_folders: vec![
                node(
                    "a",
                    vec![node("a1", vec![], vec![FavoriteLink::new("c1", 0)])],
                    vec![FavoriteLink::new("c1", 3)],
                ),
                node("b", vec![], vec![]),
            ],
        };

        let state = ArchiveState::from_snapshot(snapshot.clone());
        assert_eq!(state.folder_count(), 3);
        assert_eq!(state.root_ids(), &["a".to_string(), "b".to_string()]);
        assert_eq!(
            state.find_folder("a1").and_then(|f| f.parent_id.clone()),
            Some("a".to_string())
        );
        assert_eq!(state.to_snapshot(), snapshot);
    }

    #[test]
    fn test_from_snapshot_reassigns_duplicate_ids() {
        let snapshot = ArchiveSnapshot {
            version: 1,
            root_folders: vec![node("dup", vec![], vec![]), node("dup", vec![], vec![])],
        };
        let state = ArchiveState::from_snapshot(snapshot);
        assert_eq!(state.folder_count(), 2);
        assert_eq!(state.root_ids()[0], "dup");
        assert_ne!(state.root_ids()[1], "dup");
    }

    #[test]
    fn test_from_snapshot_keeps_first_copy_of_duplicate_link() {
        let link = FavoriteLink::new("c1", 4);
        let snapshot = ArchiveSnapshot {
            version: 1,
            root_folders: vec![
                node("a", vec![node("a1", vec![], vec![link.clone()])], vec![]),
                node("b", vec![], vec![link.clone(), link.clone()]),
            ],
        };
        let state = ArchiveState::from_snapshot(snapshot);
        assert!(state.find_folder("a1").unwrap().contains_link(&link));
        assert!(state.find_folder("b").unwrap().links.is_empty());
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let state = ArchiveState::from_snapshot(ArchiveSnapshot {
            version: 1,
            root_folders: vec![node("a", vec![], vec![FavoriteLink::new("c1", 2)])],
        });
        let value = state.to_value().unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["rootFolders"][0]["id"], "a");
        assert_eq!(value["rootFolders"][0]["createdAt"], 1);
        assert_eq!(value["rootFolders"][0]["links"][0]["conversationId"], "c1");
        assert_eq!(value["rootFolders"][0]["links"][0]["nodeIndex"], 2);
    }
}
