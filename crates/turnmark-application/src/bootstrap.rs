//! Service wiring.

use crate::archive_store::ArchiveStore;
use crate::bookmark_service::BookmarkService;
use crate::conversation_view::ConversationView;
use crate::favorite_store::FavoriteStore;
use crate::pinned_store::PinnedMarkStore;
use std::sync::Arc;
use turnmark_core::config::TurnmarkConfig;
use turnmark_core::error::Result;
use turnmark_core::navigation::TurnSource;
use turnmark_core::storage::KeyValueStore;
use turnmark_infrastructure::logging::init_tracing;
use turnmark_infrastructure::{ConfigService, JsonFileKeyValueStore, TurnmarkPaths};

/// Every store of the application, sharing one key-value backend.
#[derive(Clone)]
pub struct TurnmarkServices {
    config: TurnmarkConfig,
    pins: PinnedMarkStore,
    bookmarks: BookmarkService,
}

impl TurnmarkServices {
    /// Builds the services over an existing backend.
    pub fn from_store(store: Arc<dyn KeyValueStore>, config: &TurnmarkConfig) -> Self {
        let pins = PinnedMarkStore::new(store.clone(), config.storage.pinned_prefix.clone());
        let favorites = FavoriteStore::new(store.clone(), config.storage.favorites_key.clone())
            .with_title_max_chars(config.favorites.title_max_chars);
        let archive = ArchiveStore::new(store, config.storage.archive_key.clone())
            .with_default_folder_name(config.favorites.default_folder_name.clone());

        Self {
            config: config.clone(),
            pins,
            bookmarks: BookmarkService::new(favorites, archive),
        }
    }

    /// Loads the configuration, installs logging and opens the JSON file
    /// store (`storage.data_dir`, or the default store directory).
    pub async fn open(paths: &TurnmarkPaths) -> Result<Self> {
        let config = ConfigService::new(paths)?.get_config().await;
        init_tracing(&config.logging);

        let store = match &config.storage.data_dir {
            Some(dir) => JsonFileKeyValueStore::new(dir.clone()).await?,
            None => JsonFileKeyValueStore::default_location(paths).await?,
        };
        tracing::info!(store = ?store.base_dir(), "Turnmark services ready");

        Ok(Self::from_store(Arc::new(store), &config))
    }

    pub fn config(&self) -> &TurnmarkConfig {
        &self.config
    }

    pub fn pins(&self) -> &PinnedMarkStore {
        &self.pins
    }

    pub fn bookmarks(&self) -> &BookmarkService {
        &self.bookmarks
    }

    /// Opens a view on a conversation with the configured snap distance.
    pub async fn open_conversation<S: TurnSource>(
        &self,
        conversation_id: &str,
        source: S,
    ) -> ConversationView<S> {
        ConversationView::open(
            conversation_id,
            source,
            self.pins.clone(),
            self.config.navigation.bottom_snap_threshold_px,
        )
        .await
    }
}
