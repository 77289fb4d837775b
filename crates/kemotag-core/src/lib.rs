//! Kemotag Core
//!
//! Offline persistence for the web client: locally saved bookmarks and
//! profile view history, exposed through [`OfflineDb`]. Nothing here
//! returns a raw storage error; every operation yields an [`OfflineResult`].

mod config;
mod error;
mod offline;
mod profile;
mod profile_id;

pub use config::Config;
pub use error::CoreError;
pub use offline::OfflineDb;
pub use profile::{ProfileLookup, ProfileRecord};
pub use profile_id::{generate_profile_id, is_valid_profile_id, PROFILE_ID_LENGTH};

// Re-export store components
pub use kemotag_bookmarks::{BookmarkQuery, BookmarkRecord, BookmarkStore};
pub use kemotag_history::{
    NewViewHistoryEntry, ViewHistoryQuery, ViewHistoryRecord, ViewHistoryStore,
};
pub use kemotag_storage::{
    constants, Clock, Database, Envelope, ErrorCode, OfflineError, OfflineResult, SteppingClock,
    StorageError, StorageTarget, SystemClock,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
