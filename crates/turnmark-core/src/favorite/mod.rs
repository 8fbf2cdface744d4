//! Favorite conversation records and turn links.

mod model;
pub(crate) mod normalize;

pub use model::{
    FavoriteConversation, FavoriteItem, FavoriteItemDraft, FavoriteLink, TITLE_ELLIPSIS,
    truncate_title,
};
pub use normalize::{normalize_item, normalize_record, normalize_records};
