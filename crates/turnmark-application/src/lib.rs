//! Application layer for turnmark.
//!
//! This crate provides the async stores over the key-value port and the
//! services that coordinate them: bookmark consistency between favorites and
//! archive, and the per-conversation view state.

pub mod archive_store;
pub mod bookmark_service;
pub mod bootstrap;
pub mod conversation_view;
pub mod favorite_store;
pub mod pinned_store;

#[cfg(test)]
mod test_support;

pub use archive_store::ArchiveStore;
pub use bookmark_service::BookmarkService;
pub use bootstrap::TurnmarkServices;
pub use conversation_view::ConversationView;
pub use favorite_store::FavoriteStore;
pub use pinned_store::PinnedMarkStore;
