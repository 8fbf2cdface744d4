//! Archive tree mutations.
//!
//! All operations are synchronous and never fail. Logical no-ops (unknown
//! folder, link not present) are reported as `false`.

use super::model::{ArchiveFolder, ArchiveState, DEFAULT_FOLDER_NAME};
use crate::favorite::FavoriteLink;
use crate::time::now_millis;
use std::collections::HashSet;

impl ArchiveState {
    /// Creates a folder under `parent_id`.
    ///
    /// Falls back to a top-level folder when `parent_id` is `None` or names
    /// a folder that does not exist. A blank name becomes
    /// [`DEFAULT_FOLDER_NAME`].
    pub fn create_folder(&mut self, parent_id: Option<&str>, name: &str) -> &ArchiveFolder {
        let now = now_millis();
        let id = uuid::Uuid::new_v4().to_string();
        let name = match name.trim() {
            "" => DEFAULT_FOLDER_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };

        let parent_id = match parent_id.and_then(|p| self.folders.get_mut(p)) {
            Some(parent) => {
                parent.children.push(id.clone());
                Some(parent.id.clone())
            }
            None => {
                self.root_ids.push(id.clone());
                None
            }
        };

        tracing::debug!(folder_id = %id, parent = ?parent_id, "Archive folder created");

        self.folders.entry(id.clone()).or_insert(ArchiveFolder {
            id,
            name,
            parent_id,
            children: Vec::new(),
            links: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Renames a folder. A blank `new_name` keeps the current name, but the
    /// folder's `updated_at` is bumped whenever it exists.
    pub fn rename_folder(&mut self, folder_id: &str, new_name: &str) -> bool {
        let Some(folder) = self.folders.get_mut(folder_id) else {
            return false;
        };
        let trimmed = new_name.trim();
        if !trimmed.is_empty() {
            folder.name = trimmed.to_string();
        }
        folder.updated_at = now_millis();
        true
    }

    /// Deletes a folder and its whole subtree, links included.
    pub fn delete_folder(&mut self, folder_id: &str) -> bool {
        if !self.folders.contains_key(folder_id) {
            return false;
        }
        self.detach(folder_id);

        let mut pending = vec![folder_id.to_string()];
        let mut removed = 0usize;
        while let Some(id) = pending.pop() {
            if let Some(folder) = self.folders.remove(&id) {
                pending.extend(folder.children);
                removed += 1;
            }
        }

        tracing::debug!(folder_id, removed, "Archive folder deleted");
        true
    }

    /// Moves `link` into `folder_id`, removing it from every other folder.
    ///
    /// # Returns
    ///
    /// `false` when the target folder does not exist or already held the link.
    pub fn add_link_to_folder(&mut self, folder_id: &str, link: &FavoriteLink) -> bool {
        if !self.folders.contains_key(folder_id) {
            return false;
        }

        let now = now_millis();
        for folder in self.folders.values_mut() {
            if folder.id != folder_id && folder.contains_link(link) {
                folder.links.retain(|l| l != link);
                folder.updated_at = now;
                tracing::debug!(from = %folder.id, link = %link, "Archive link relocated");
            }
        }

        let Some(target) = self.folders.get_mut(folder_id) else {
            return false;
        };
        if target.contains_link(link) {
            return false;
        }
        target.links.push(link.clone());
        target.updated_at = now;
        true
    }

    /// Removes `link` from `folder_id` only.
    pub fn remove_link_from_folder(&mut self, folder_id: &str, link: &FavoriteLink) -> bool {
        let Some(folder) = self.folders.get_mut(folder_id) else {
            return false;
        };
        let before = folder.links.len();
        folder.links.retain(|l| l != link);
        if folder.links.len() == before {
            return false;
        }
        folder.updated_at = now_millis();
        true
    }

    /// Identity keys of every link anywhere in the tree.
    pub fn all_link_keys(&self) -> HashSet<String> {
        self.folders
            .values()
            .flat_map(|folder| folder.links.iter().map(FavoriteLink::key))
            .collect()
    }

    /// Drops every link whose key is not in `existing_keys`. Folders are
    /// never removed.
    ///
    /// # Returns
    ///
    /// Whether anything was removed, i.e. whether the archive needs saving.
    pub fn cleanup_links(&mut self, existing_keys: &HashSet<String>) -> bool {
        let now = now_millis();
        let mut removed = 0usize;
        for folder in self.folders.values_mut() {
            let before = folder.links.len();
            folder.links.retain(|l| existing_keys.contains(&l.key()));
            if folder.links.len() != before {
                removed += before - folder.links.len();
                folder.updated_at = now;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "Orphaned archive links pruned");
        }
        removed > 0
    }

    /// The folder currently holding `link`, if any.
    pub fn folder_of_link(&self, link: &FavoriteLink) -> Option<&ArchiveFolder> {
        self.folders.values().find(|folder| folder.contains_link(link))
    }

    /// Folder ids from the root down to `folder_id`, inclusive.
    /// Empty if the folder does not exist.
    pub fn folder_path(&self, folder_id: &str) -> Vec<String> {
        let mut path = Vec::new();
        let mut cursor = self.folders.get(folder_id);
        while let Some(folder) = cursor {
            if path.len() > self.folders.len() {
                break;
            }
            path.push(folder.id.clone());
            cursor = folder
                .parent_id
                .as_deref()
                .and_then(|parent| self.folders.get(parent));
        }
        path.reverse();
        path
    }

    /// True when `folder_id` sits somewhere below `ancestor_id`.
    pub fn is_descendant(&self, folder_id: &str, ancestor_id: &str) -> bool {
        folder_id != ancestor_id
            && self
                .folder_path(folder_id)
                .iter()
                .any(|id| id == ancestor_id)
    }

    /// Re-parents a folder, or makes it top-level when `new_parent_id` is
    /// `None`. The folder is appended after its new siblings.
    ///
    /// # Returns
    ///
    /// `false` when either folder is missing, or the move would put the
    /// folder inside itself.
    pub fn move_folder(&mut self, folder_id: &str, new_parent_id: Option<&str>) -> bool {
        if !self.folders.contains_key(folder_id) {
            return false;
        }
        if let Some(parent) = new_parent_id {
            if !self.folders.contains_key(parent)
                || parent == folder_id
                || self.is_descendant(parent, folder_id)
            {
                return false;
            }
        }

        self.detach(folder_id);
        match new_parent_id.and_then(|p| self.folders.get_mut(p)) {
            Some(parent) => parent.children.push(folder_id.to_string()),
            None => self.root_ids.push(folder_id.to_string()),
        }

        if let Some(folder) = self.folders.get_mut(folder_id) {
            folder.parent_id = new_parent_id.map(str::to_string);
            folder.updated_at = now_millis();
        }
        true
    }

    /// Unlinks a folder from its parent's child list (or the root list).
    fn detach(&mut self, folder_id: &str) {
        let parent_id = self
            .folders
            .get(folder_id)
            .and_then(|folder| folder.parent_id.clone());
        match parent_id.and_then(|p| self.folders.get_mut(&p)) {
            Some(parent) => parent.children.retain(|id| id != folder_id),
            None => self.root_ids.retain(|id| id != folder_id),
        }
    }
}
