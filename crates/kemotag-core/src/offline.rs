//! Public offline store facade

use kemotag_bookmarks::{BookmarkQuery, BookmarkRecord, BookmarkStore};
use kemotag_history::{NewViewHistoryEntry, ViewHistoryQuery, ViewHistoryRecord, ViewHistoryStore};
use kemotag_storage::{Database, ErrorCode, OfflineError, OfflineResult};

use crate::config::Config;
use crate::profile::ProfileLookup;
use crate::profile_id::is_valid_profile_id;

/// Offline store instance
///
/// Owns one lazily opened [`Database`] shared by both stores. Cloning is
/// cheap and clones share the connection.
pub struct OfflineDb {
    db: Database,
    bookmarks: BookmarkStore,
    history: ViewHistoryStore,
}

impl OfflineDb {
    pub fn new(config: &Config) -> Self {
        Self::with_database(config.database())
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            bookmarks: BookmarkStore::new(db.clone()),
            history: ViewHistoryStore::new(db.clone()),
            db,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Capability check; never fails, `Ok(false)` means offline features are off.
    pub fn is_storage_available(&self) -> OfflineResult<bool> {
        Ok(self.db.is_available())
    }

    /// Release the cached connection. The next call reopens it.
    pub async fn reset(&self) {
        self.db.reset().await;
    }

    // === Bookmarks ===

    pub async fn save_bookmark(&self, profile_id: &str) -> OfflineResult<()> {
        self.bookmarks.save(profile_id).await
    }

    pub async fn unsave_bookmark(&self, profile_id: &str) -> OfflineResult<()> {
        self.bookmarks.unsave(profile_id).await
    }

    pub async fn list_bookmarks(&self, query: BookmarkQuery) -> OfflineResult<Vec<BookmarkRecord>> {
        self.bookmarks.list(query).await
    }

    pub async fn get_bookmark(&self, profile_id: &str) -> OfflineResult<Option<BookmarkRecord>> {
        self.bookmarks.get(profile_id).await
    }

    pub async fn is_bookmarked(&self, profile_id: &str) -> OfflineResult<bool> {
        self.bookmarks.is_bookmarked(profile_id).await
    }

    pub async fn hard_delete_bookmark(&self, profile_id: &str) -> OfflineResult<()> {
        self.bookmarks.hard_delete(profile_id).await
    }

    // === View history ===

    pub async fn add_view_history_entry(
        &self,
        entry: NewViewHistoryEntry,
    ) -> OfflineResult<ViewHistoryRecord> {
        self.history.add(entry).await
    }

    pub async fn list_view_history(
        &self,
        query: ViewHistoryQuery,
    ) -> OfflineResult<Vec<ViewHistoryRecord>> {
        self.history.list(query).await
    }

    pub async fn count_view_history(&self) -> OfflineResult<usize> {
        self.history.count().await
    }

    pub async fn clear_view_history(&self) -> OfflineResult<()> {
        self.history.clear().await
    }

    /// Look up a profile and record a snapshot of it in the view history.
    pub async fn record_profile_view<L>(
        &self,
        lookup: &L,
        profile_id: &str,
    ) -> OfflineResult<ViewHistoryRecord>
    where
        L: ProfileLookup + ?Sized,
    {
        if !is_valid_profile_id(profile_id) {
            return Err(OfflineError::new(
                ErrorCode::OperationFailed,
                format!("Invalid profile id: {profile_id}"),
            ));
        }

        let profile = lookup.profile(profile_id).await.ok_or_else(|| {
            OfflineError::new(
                ErrorCode::NotFound,
                format!("Profile not found: {profile_id}"),
            )
        })?;

        tracing::debug!(profile_id = %profile.id, "Recording profile view");

        self.history
            .add(NewViewHistoryEntry::new(
                profile.id,
                profile.display_name,
                profile.x_username,
            ))
            .await
    }
}

impl Clone for OfflineDb {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            bookmarks: self.bookmarks.clone(),
            history: self.history.clone(),
        }
    }
}
