//! Kemotag View History
//!
//! Most-recent-first log of viewed profiles:
//! - one entry per profile; viewing again refreshes it
//! - at most `VIEW_HISTORY_MAX` entries, oldest evicted first

mod entry;
mod store;

pub use entry::{NewViewHistoryEntry, ViewHistoryQuery, ViewHistoryRecord};
pub use store::ViewHistoryStore;
