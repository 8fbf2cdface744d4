//! Favorites and archive, kept consistent with each other.

use crate::archive_store::ArchiveStore;
use crate::favorite_store::FavoriteStore;
use std::collections::HashSet;
use turnmark_core::archive::{ArchiveFolder, ArchiveSnapshot};
use turnmark_core::error::Result;
use turnmark_core::favorite::{
    FavoriteConversation, FavoriteItem, FavoriteItemDraft, FavoriteLink,
};

/// Coordinates the favorite records and the archive tree.
///
/// Archive folders only reference favorite turns. Every favorite mutation
/// that can drop turns is followed by a pass that prunes archive links
/// pointing at turns that are no longer favorited.
#[derive(Clone)]
pub struct BookmarkService {
    favorites: FavoriteStore,
    archive: ArchiveStore,
}

impl BookmarkService {
    pub fn new(favorites: FavoriteStore, archive: ArchiveStore) -> Self {
        Self { favorites, archive }
    }

    pub fn favorites(&self) -> &FavoriteStore {
        &self.favorites
    }

    pub fn archive(&self) -> &ArchiveStore {
        &self.archive
    }

    // ============================================================================
    // Favorites
    // ============================================================================

    /// Favorites a conversation. Re-favoriting replaces the items, so
    /// archive links to dropped turns are pruned afterwards.
    pub async fn favorite_conversation(
        &self,
        conversation_id: &str,
        url: &str,
        site_name: &str,
        chat_title: &str,
        items: Vec<FavoriteItemDraft>,
    ) -> Result<FavoriteConversation> {
        let record = self
            .favorites
            .favorite_conversation(conversation_id, url, site_name, chat_title, items)
            .await?;
        self.cleanup_archive().await?;
        Ok(record)
    }

    pub async fn update_favorite_items(
        &self,
        conversation_id: &str,
        items: Vec<FavoriteItem>,
    ) -> Result<bool> {
        let changed = self
            .favorites
            .update_favorite_items(conversation_id, items)
            .await?;
        if changed {
            self.cleanup_archive().await?;
        }
        Ok(changed)
    }

    pub async fn remove_item(&self, conversation_id: &str, node_index: u32) -> Result<bool> {
        let removed = self.favorites.remove_item(conversation_id, node_index).await?;
        if removed {
            self.cleanup_archive().await?;
        }
        Ok(removed)
    }

    pub async fn unfavorite_conversation(&self, conversation_id: &str) -> Result<bool> {
        let removed = self.favorites.unfavorite_conversation(conversation_id).await?;
        if removed {
            self.cleanup_archive().await?;
        }
        Ok(removed)
    }

    pub async fn existing_link_keys(&self) -> Result<HashSet<String>> {
        self.favorites.existing_link_keys().await
    }

    /// Prunes archive links whose turn is no longer favorited.
    ///
    /// When the favorites cannot be read the pass is skipped, since an
    /// unreadable collection would otherwise look empty and wipe every link.
    ///
    /// # Returns
    ///
    /// Whether the archive changed and was saved.
    pub async fn cleanup_archive(&self) -> Result<bool> {
        let existing = match self.favorites.existing_link_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Skipping archive cleanup, favorites unreadable: {}", e);
                return Ok(false);
            }
        };
        self.archive
            .mutate(|state| state.cleanup_links(&existing))
            .await
    }

    // ============================================================================
    // Archive
    // ============================================================================

    /// Files a favorite turn into a folder, moving it out of any other
    /// folder.
    ///
    /// # Returns
    ///
    /// `false` when the turn is not favorited, the folder is missing, or the
    /// link already sits in that folder.
    pub async fn archive_link(&self, folder_id: &str, link: &FavoriteLink) -> Result<bool> {
        if !self.favorites.existing_link_keys().await?.contains(&link.key()) {
            tracing::debug!(link = %link, "Refusing to archive a turn that is not favorited");
            return Ok(false);
        }
        self.archive
            .mutate(|state| state.add_link_to_folder(folder_id, link))
            .await
    }

    pub async fn unarchive_link(&self, folder_id: &str, link: &FavoriteLink) -> Result<bool> {
        self.archive
            .mutate(|state| state.remove_link_from_folder(folder_id, link))
            .await
    }

    /// Favorite turns that are not filed in any folder yet, in favorites
    /// order.
    pub async fn importable_links(&self) -> Vec<FavoriteLink> {
        let archived = self.archive.load().await.all_link_keys();
        self.favorites
            .links()
            .await
            .into_iter()
            .filter(|link| !archived.contains(&link.key()))
            .collect()
    }

    /// The archive as a nested tree.
    pub async fn folder_tree(&self) -> ArchiveSnapshot {
        self.archive.load().await.to_snapshot()
    }

    /// Id of the folder holding `link`, if it is archived.
    pub async fn folder_of_link(&self, link: &FavoriteLink) -> Option<String> {
        self.archive
            .load()
            .await
            .folder_of_link(link)
            .map(|folder| folder.id.clone())
    }

    /// Folder ids from the root down to `folder_id`.
    pub async fn folder_path(&self, folder_id: &str) -> Vec<String> {
        self.archive.load().await.folder_path(folder_id)
    }

    /// Creates a folder. A blank name uses the configured default folder
    /// name.
    pub async fn create_folder(&self, parent_id: Option<&str>, name: &str) -> Result<ArchiveFolder> {
        let name = match name.trim() {
            "" => self.archive.default_folder_name(),
            _ => name,
        };
        let mut state = self.archive.try_load().await?;
        let folder = state.create_folder(parent_id, name).clone();
        self.archive.save(&state).await?;
        Ok(folder)
    }

    pub async fn rename_folder(&self, folder_id: &str, new_name: &str) -> Result<bool> {
        self.archive
            .mutate(|state| state.rename_folder(folder_id, new_name))
            .await
    }

    /// Deletes a folder with its whole subtree. Links inside become
    /// importable again.
    pub async fn delete_folder(&self, folder_id: &str) -> Result<bool> {
        self.archive
            .mutate(|state| state.delete_folder(folder_id))
            .await
    }

    pub async fn move_folder(&self, folder_id: &str, new_parent_id: Option<&str>) -> Result<bool> {
        self.archive
            .mutate(|state| state.move_folder(folder_id, new_parent_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FailingStore;
    use std::sync::Arc;
    use turnmark_core::storage::KeyValueStore;
    use turnmark_infrastructure::MemoryKeyValueStore;

    fn service_over(store: Arc<dyn KeyValueStore>) -> BookmarkService {
        BookmarkService::new(
            FavoriteStore::new(store.clone(), "favorites"),
            ArchiveStore::new(store, "favorites-archive"),
        )
    }

    fn create_test_service() -> BookmarkService {
        service_over(Arc::new(MemoryKeyValueStore::new()))
    }

    async fn favorite(service: &BookmarkService, conversation_id: &str, indexes: &[u32]) {
        let items = indexes
            .iter()
            .map(|i| FavoriteItemDraft::new(*i, format!("prompt {}", i)))
            .collect();
        service
            .favorite_conversation(conversation_id, "", "", "title", items)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_item_prunes_archived_link_but_keeps_folder() {
        let service = create_test_service();
        favorite(&service, "c1", &[2]).await;
        let folder = service.create_folder(None, "F").await.unwrap();
        let link = FavoriteLink::new("c1", 2);
        assert!(service.archive_link(&folder.id, &link).await.unwrap());

        assert!(service.remove_item("c1", 2).await.unwrap());

        let state = service.archive().load().await;
        let kept = state.find_folder(&folder.id).unwrap();
        assert!(kept.links.is_empty());
        assert!(service.favorites().is_favorited("c1").await);
    }

    #[tokio::test]
    async fn test_unfavorite_prunes_every_link_of_the_conversation() {
        let service = create_test_service();
        favorite(&service, "c1", &[0, 1]).await;
        favorite(&service, "c2", &[0]).await;
        let folder = service.create_folder(None, "F").await.unwrap();
        for link in [
            FavoriteLink::new("c1", 0),
            FavoriteLink::new("c1", 1),
            FavoriteLink::new("c2", 0),
        ] {
            service.archive_link(&folder.id, &link).await.unwrap();
        }

        assert!(service.unfavorite_conversation("c1").await.unwrap());

        let keys = service.archive().load().await.all_link_keys();
        assert_eq!(keys, HashSet::from(["c2#0".to_string()]));
    }

    #[tokio::test]
    async fn test_refavoriting_with_fewer_items_prunes_archive() {
        let service = create_test_service();
        favorite(&service, "c1", &[0, 1]).await;
        let folder = service.create_folder(None, "F").await.unwrap();
        service
            .archive_link(&folder.id, &FavoriteLink::new("c1", 1))
            .await
            .unwrap();

        favorite(&service, "c1", &[0]).await;

        assert!(service.archive().load().await.all_link_keys().is_empty());
    }

    #[tokio::test]
    async fn test_archive_link_refuses_unfavorited_turn() {
        let service = create_test_service();
        favorite(&service, "c1", &[0]).await;
        let folder = service.create_folder(None, "F").await.unwrap();

        let stray = FavoriteLink::new("c1", 7);
        assert!(!service.archive_link(&folder.id, &stray).await.unwrap());
        assert!(service.folder_of_link(&stray).await.is_none());
    }

    #[tokio::test]
    async fn test_archive_link_relocates_between_folders() {
        let service = create_test_service();
        favorite(&service, "c1", &[0]).await;
        let a = service.create_folder(None, "A").await.unwrap();
        let b = service.create_folder(None, "B").await.unwrap();
        let link = FavoriteLink::new("c1", 0);

        assert!(service.archive_link(&a.id, &link).await.unwrap());
        assert!(service.archive_link(&b.id, &link).await.unwrap());
        assert!(!service.archive_link(&b.id, &link).await.unwrap());

        assert_eq!(service.folder_of_link(&link).await, Some(b.id.clone()));
        assert!(service.unarchive_link(&b.id, &link).await.unwrap());
        assert_eq!(service.folder_of_link(&link).await, None);
    }

    #[tokio::test]
    async fn test_importable_links_excludes_archived() {
        let service = create_test_service();
        favorite(&service, "c1", &[0, 1]).await;
        let folder = service.create_folder(None, "F").await.unwrap();
        service
            .archive_link(&folder.id, &FavoriteLink::new("c1", 0))
            .await
            .unwrap();

        assert_eq!(
            service.importable_links().await,
            vec![FavoriteLink::new("c1", 1)]
        );

        service.delete_folder(&folder.id).await.unwrap();
        assert_eq!(service.importable_links().await.len(), 2);
    }

    #[tokio::test]
    async fn test_folder_operations_are_persisted() {
        let service = create_test_service();
        let parent = service.create_folder(None, "Rust").await.unwrap();
        let child = service.create_folder(Some(&parent.id), "").await.unwrap();
        assert_eq!(child.name, "New Folder");

        assert!(service.rename_folder(&child.id, "Async").await.unwrap());
        assert!(!service.move_folder(&parent.id, Some(&child.id)).await.unwrap());
        assert!(service.move_folder(&child.id, None).await.unwrap());

        let tree = service.folder_tree().await;
        assert_eq!(tree.version, 1);
        let names: Vec<_> = tree.root_folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Async"]);
        assert_eq!(service.folder_path(&child.id).await, vec![child.id.clone()]);

        assert!(service.delete_folder(&parent.id).await.unwrap());
        assert!(!service.rename_folder(&parent.id, "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup_skipped_when_favorites_unreadable() {
        let backend = Arc::new(FailingStore::default());
        let service = service_over(backend.clone());
        favorite(&service, "c1", &[0]).await;
        let folder = service.create_folder(None, "F").await.unwrap();
        service
            .archive_link(&folder.id, &FavoriteLink::new("c1", 0))
            .await
            .unwrap();

        backend.set_fail_reads(true);
        assert!(!service.cleanup_archive().await.unwrap());
        backend.set_fail_reads(false);

        assert_eq!(service.archive().load().await.all_link_keys().len(), 1);
    }

    #[tokio::test]
    async fn test_folder_writes_fail_instead_of_wiping_archive() {
        let backend = Arc::new(FailingStore::default());
        let service = service_over(backend.clone());
        let kept = service.create_folder(None, "Kept").await.unwrap();

        backend.set_fail_reads(true);
        assert!(service.create_folder(None, "Lost").await.is_err());
        assert!(service.rename_folder(&kept.id, "Renamed").await.is_err());
        backend.set_fail_reads(false);

        let tree = service.folder_tree().await;
        assert_eq!(tree.root_folders.len(), 1);
        assert_eq!(tree.root_folders[0].name, "Kept");
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent() {
        let service = create_test_service();
        favorite(&service, "c1", &[0, 1]).await;
        let folder = service.create_folder(None, "F").await.unwrap();
        service
            .archive_link(&folder.id, &FavoriteLink::new("c1", 1))
            .await
            .unwrap();
        service
            .favorites()
            .update_favorite_items("c1", vec![])
            .await
            .unwrap();

        assert!(service.cleanup_archive().await.unwrap());
        assert!(!service.cleanup_archive().await.unwrap());
    }
}
