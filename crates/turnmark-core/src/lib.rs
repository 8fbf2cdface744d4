//! turnmark-core: domain model and pure logic for turn navigation and
//! favorite bookmarks.
//!
//! Nothing in this crate performs I/O. Persistence goes through the
//! [`storage::KeyValueStore`] port, turn discovery through the
//! [`navigation::TurnSource`] port.

pub mod archive;
pub mod config;
pub mod error;
pub mod favorite;
pub mod navigation;
pub mod pinned;
pub mod storage;
pub mod time;

// Re-export common error type
pub use error::TurnmarkError;
