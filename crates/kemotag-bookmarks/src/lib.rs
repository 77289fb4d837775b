//! Kemotag Bookmarks
//!
//! Locally saved profiles. Unsaving is a soft delete: the record stays with
//! `deleted_at` set until it is saved again or hard-deleted.

mod record;
mod store;

pub use record::{BookmarkQuery, BookmarkRecord};
pub use store::BookmarkStore;
