//! Favorite archive: a folder tree of links to favorite turns.
//!
//! # Module Structure
//!
//! - `model`: arena-backed [`ArchiveState`] and [`ArchiveFolder`]
//! - `tree`: folder and link mutations, cleanup, traversal helpers
//! - `snapshot`: the nested shape used for persistence and rendering
//! - `normalize`: defensive decoding of stored JSON

mod model;
mod normalize;
mod snapshot;
mod tree;

pub use model::{ARCHIVE_VERSION, ArchiveFolder, ArchiveState, DEFAULT_FOLDER_NAME};
pub use normalize::{normalize_folder, normalize_link, normalize_state, normalize_state_with};
pub use snapshot::{ArchiveSnapshot, FolderNode};
