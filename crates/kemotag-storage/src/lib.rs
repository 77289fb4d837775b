//! Kemotag Storage Layer
//!
//! SQLite-backed offline persistence shared by the bookmark and view
//! history stores. Every public operation funnels through [`run`], so
//! callers only ever see an [`OfflineResult`].

mod clock;
mod database;
mod error;
mod mapping;
mod migrations;
mod wrapper;

pub use clock::{from_millis, Clock, SteppingClock, SystemClock};
pub use database::{Database, StorageTarget};
pub use error::StorageError;
pub use mapping::{to_error, ErrorCode, OfflineError};
pub use wrapper::{run, Envelope, OfflineResult};

pub type Result<T> = std::result::Result<T, StorageError>;

/// Fixed names and limits of the offline store.
pub mod constants {
    pub const DB_NAME: &str = "kemotag-offline";
    pub const DB_VERSION: i32 = 1;
    pub const VIEW_HISTORY_MAX: usize = 300;

    pub const BOOKMARKS_TABLE: &str = "bookmarks";
    pub const VIEW_HISTORY_TABLE: &str = "view_history";

    pub const BY_LAST_VIEWED_INDEX: &str = "by_last_viewed";
    pub const BY_DELETED_AT_INDEX: &str = "by_deleted_at";
}
