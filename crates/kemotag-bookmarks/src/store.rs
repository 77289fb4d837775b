//! Bookmark store

use rusqlite::OptionalExtension;

use kemotag_storage::{run, Database, OfflineResult};

use crate::record::{BookmarkQuery, BookmarkRecord};

pub struct BookmarkStore {
    db: Database,
}

impl BookmarkStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Save a bookmark, overwriting any existing record.
    ///
    /// Also restores a soft-deleted bookmark.
    pub async fn save(&self, profile_id: &str) -> OfflineResult<()> {
        let profile_id = profile_id.to_string();
        let clock = self.db.clock();

        run(|| async move {
            self.db
                .write(move |conn| {
                    let now = clock.now().timestamp_millis();
                    conn.execute(
                        "INSERT OR REPLACE INTO bookmarks (profile_id, deleted_at, updated_at)
                         VALUES (?1, NULL, ?2)",
                        rusqlite::params![profile_id, now],
                    )?;
                    tracing::debug!(profile_id = %profile_id, "Saved bookmark");
                    Ok(())
                })
                .await
        })
        .await
    }

    /// Soft delete. Unknown ids are a no-op.
    pub async fn unsave(&self, profile_id: &str) -> OfflineResult<()> {
        let profile_id = profile_id.to_string();
        let clock = self.db.clock();

        run(|| async move {
            self.db
                .write(move |conn| {
                    let exists = conn
                        .query_row(
                            "SELECT 1 FROM bookmarks WHERE profile_id = ?1",
                            [&profile_id],
                            |_| Ok(()),
                        )
                        .optional()?
                        .is_some();

                    if exists {
                        let now = clock.now().timestamp_millis();
                        conn.execute(
                            "UPDATE bookmarks SET deleted_at = ?2, updated_at = ?2
                             WHERE profile_id = ?1",
                            rusqlite::params![profile_id, now],
                        )?;
                        tracing::debug!(profile_id = %profile_id, "Unsaved bookmark");
                    }
                    Ok(())
                })
                .await
        })
        .await
    }

    /// List bookmarks in key order, active ones only unless asked otherwise.
    pub async fn list(&self, query: BookmarkQuery) -> OfflineResult<Vec<BookmarkRecord>> {
        run(|| async move {
            self.db
                .read(move |conn| {
                    let mut stmt = conn.prepare(
                        "SELECT profile_id, deleted_at, updated_at FROM bookmarks
                         WHERE ?1 OR deleted_at IS NULL
                         ORDER BY profile_id",
                    )?;

                    let records = stmt
                        .query_map([query.include_deleted], BookmarkRecord::from_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;

                    Ok(records)
                })
                .await
        })
        .await
    }

    /// Fetch a record whether or not it is soft-deleted.
    pub async fn get(&self, profile_id: &str) -> OfflineResult<Option<BookmarkRecord>> {
        let profile_id = profile_id.to_string();

        run(|| async move {
            self.db
                .read(move |conn| {
                    let record = conn
                        .query_row(
                            "SELECT profile_id, deleted_at, updated_at FROM bookmarks
                             WHERE profile_id = ?1",
                            [&profile_id],
                            BookmarkRecord::from_row,
                        )
                        .optional()?;
                    Ok(record)
                })
                .await
        })
        .await
    }

    /// True only for an existing, active record.
    pub async fn is_bookmarked(&self, profile_id: &str) -> OfflineResult<bool> {
        let profile_id = profile_id.to_string();

        run(|| async move {
            self.db
                .read(move |conn| {
                    let deleted_at: Option<Option<i64>> = conn
                        .query_row(
                            "SELECT deleted_at FROM bookmarks WHERE profile_id = ?1",
                            [&profile_id],
                            |row| row.get(0),
                        )
                        .optional()?;
                    Ok(matches!(deleted_at, Some(None)))
                })
                .await
        })
        .await
    }

    /// Permanently remove a record. Unknown ids are not an error.
    pub async fn hard_delete(&self, profile_id: &str) -> OfflineResult<()> {
        let profile_id = profile_id.to_string();

        run(|| async move {
            self.db
                .write(move |conn| {
                    let removed =
                        conn.execute("DELETE FROM bookmarks WHERE profile_id = ?1", [&profile_id])?;
                    tracing::debug!(profile_id = %profile_id, removed, "Hard deleted bookmark");
                    Ok(())
                })
                .await
        })
        .await
    }
}

impl Clone for BookmarkStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use kemotag_storage::{ErrorCode, SteppingClock};

    fn store() -> BookmarkStore {
        let db = Database::open_in_memory().with_clock(Arc::new(SteppingClock::from_epoch()));
        BookmarkStore::new(db)
    }

    #[tokio::test]
    async fn test_save_then_unsave() {
        let store = store();

        store.save("alice").await.unwrap();
        assert!(store.is_bookmarked("alice").await.unwrap());

        store.unsave("alice").await.unwrap();
        assert!(!store.is_bookmarked("alice").await.unwrap());

        let all = store.list(BookmarkQuery::including_deleted()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].profile_id, "alice");
        assert!(all[0].deleted_at.is_some());

        let active = store.list(BookmarkQuery::default()).await.unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn test_save_twice_keeps_one_record_with_later_timestamp() {
        let store = store();

        store.save("alice").await.unwrap();
        let first = store.get("alice").await.unwrap().unwrap();
        store.save("alice").await.unwrap();
        let second = store.get("alice").await.unwrap().unwrap();

        let all = store.list(BookmarkQuery::including_deleted()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_save_resurrects_soft_deleted() {
        let store = store();

        store.save("alice").await.unwrap();
        store.unsave("alice").await.unwrap();
        store.save("alice").await.unwrap();

        let record = store.get("alice").await.unwrap().unwrap();
        assert!(record.deleted_at.is_none());
        assert!(store.is_bookmarked("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_unsave_sets_both_timestamps() {
        let store = store();

        store.save("alice").await.unwrap();
        store.unsave("alice").await.unwrap();

        let record = store.get("alice").await.unwrap().unwrap();
        assert_eq!(record.deleted_at, Some(record.updated_at));
    }

    #[tokio::test]
    async fn test_unsave_unknown_is_noop() {
        let store = store();

        store.unsave("ghost").await.unwrap();
        assert!(store.get("ghost").await.unwrap().is_none());
        assert!(!store.is_bookmarked("ghost").await.unwrap());
    }

    #[tokio::test]
    async fn test_hard_delete() {
        let store = store();

        store.save("alice").await.unwrap();
        store.unsave("alice").await.unwrap();
        store.hard_delete("alice").await.unwrap();

        let all = store.list(BookmarkQuery::including_deleted()).await.unwrap();
        assert!(all.is_empty());

        // Never saved
        store.hard_delete("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_is_key_ordered_and_filters_deleted() {
        let store = store();

        for id in ["carol", "alice", "bob"] {
            store.save(id).await.unwrap();
        }
        store.unsave("bob").await.unwrap();

        let active: Vec<_> = store
            .list(BookmarkQuery::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.profile_id)
            .collect();
        assert_eq!(active, vec!["alice", "carol"]);

        let all: Vec<_> = store
            .list(BookmarkQuery::including_deleted())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.profile_id)
            .collect();
        assert_eq!(all, vec!["alice", "bob", "carol"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_are_stamped_in_commit_order() {
        let store = store();

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.save(&format!("p{i:02}")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stamps = store
            .db
            .read(|conn| {
                let mut stmt = conn.prepare("SELECT updated_at FROM bookmarks ORDER BY rowid")?;
                let stamps = stmt
                    .query_map([], |row| row.get::<_, i64>(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(stamps)
            })
            .await
            .unwrap();

        assert_eq!(stamps.len(), 32);
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn test_unavailable_storage() {
        let store = BookmarkStore::new(Database::unavailable());

        let errors = [
            store.save("alice").await.unwrap_err(),
            store.unsave("alice").await.unwrap_err(),
            store.list(BookmarkQuery::default()).await.unwrap_err(),
            store.is_bookmarked("alice").await.unwrap_err(),
            store.hard_delete("alice").await.unwrap_err(),
        ];
        for error in errors {
            assert_eq!(error.code, ErrorCode::DbNotAvailable);
        }
    }
}
