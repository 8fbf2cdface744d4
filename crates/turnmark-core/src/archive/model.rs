//! Archive domain model.
//!
//! Folders live in a flat arena keyed by id. Parent and child relations are
//! id references, so a folder is never copied or aliased while the tree is
//! edited. The nested shape only exists in [`ArchiveSnapshot`](super::ArchiveSnapshot).

use crate::favorite::FavoriteLink;
use std::collections::HashMap;

/// Persisted archive schema version.
pub const ARCHIVE_VERSION: u32 = 1;

/// Name used for folders created or loaded without a usable one.
pub const DEFAULT_FOLDER_NAME: &str = "New Folder";

/// One folder of the archive tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFolder {
    pub id: String,
    pub name: String,
    /// `None` for top-level folders.
    pub parent_id: Option<String>,
    /// Child folder ids, in display order.
    pub children: Vec<String>,
    pub links: Vec<FavoriteLink>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ArchiveFolder {
    pub fn contains_link(&self, link: &FavoriteLink) -> bool {
        self.links.iter().any(|l| l == link)
    }
}

/// In-memory archive: every folder of the tree plus the ordered root ids.
///
/// Invariants kept by every mutation:
/// - folder ids are unique (they are the arena keys)
/// - a link appears in at most one folder
/// - `children`/`parent_id`/`root_ids` agree with each other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveState {
    pub(super) folders: HashMap<String, ArchiveFolder>,
    pub(super) root_ids: Vec<String>,
}

impl ArchiveState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn root_ids(&self) -> &[String] {
        &self.root_ids
    }

    /// Top-level folders, in order.
    pub fn root_folders(&self) -> Vec<&ArchiveFolder> {
        self.resolve(&self.root_ids)
    }

    /// Direct children of `folder_id`, in order. Empty if the folder is missing.
    pub fn children(&self, folder_id: &str) -> Vec<&ArchiveFolder> {
        match self.folders.get(folder_id) {
            Some(folder) => self.resolve(&folder.children),
            None => Vec::new(),
        }
    }

    /// Looks a folder up anywhere in the tree.
    pub fn find_folder(&self, folder_id: &str) -> Option<&ArchiveFolder> {
        self.folders.get(folder_id)
    }

    pub fn contains_folder(&self, folder_id: &str) -> bool {
        self.folders.contains_key(folder_id)
    }

    /// Iterates over every folder, in no particular order.
    pub fn folders(&self) -> impl Iterator<Item = &ArchiveFolder> {
        self.folders.values()
    }

    fn resolve(&self, ids: &[String]) -> Vec<&ArchiveFolder> {
        ids.iter().filter_map(|id| self.folders.get(id)).collect()
    }
}
