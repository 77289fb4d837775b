//! View history store

use rusqlite::OptionalExtension;

use kemotag_storage::constants::VIEW_HISTORY_MAX;
use kemotag_storage::{run, Database, OfflineResult};

use crate::entry::{NewViewHistoryEntry, ViewHistoryQuery, ViewHistoryRecord};

pub struct ViewHistoryStore {
    db: Database,
}

impl ViewHistoryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record a view, refreshing an existing entry for the same profile.
    ///
    /// When the log is full, the single least recently viewed entry is
    /// evicted first, even if the incoming profile is already present.
    pub async fn add(&self, entry: NewViewHistoryEntry) -> OfflineResult<ViewHistoryRecord> {
        let clock = self.db.clock();

        run(|| async move {
            self.db
                .write(move |conn| {
                    let count: i64 =
                        conn.query_row("SELECT COUNT(*) FROM view_history", [], |row| row.get(0))?;

                    if count as usize >= VIEW_HISTORY_MAX {
                        evict_oldest(conn)?;
                    }

                    // Stamped under the write lock so timestamps follow commit order
                    let record = ViewHistoryRecord {
                        profile_id: entry.profile_id,
                        last_viewed_at: clock.now(),
                        display_name: entry.display_name,
                        x_username: entry.x_username,
                    };

                    // REPLACE reinserts the row, so a refreshed entry also
                    // moves to the end of insertion order.
                    conn.execute(
                        "INSERT OR REPLACE INTO view_history
                         (profile_id, last_viewed_at, display_name, x_username)
                         VALUES (?1, ?2, ?3, ?4)",
                        rusqlite::params![
                            record.profile_id,
                            record.last_viewed_at.timestamp_millis(),
                            record.display_name,
                            record.x_username,
                        ],
                    )?;

                    Ok(record)
                })
                .await
        })
        .await
    }

    /// Entries newest first, paged by `offset` and `limit`.
    pub async fn list(&self, query: ViewHistoryQuery) -> OfflineResult<Vec<ViewHistoryRecord>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = query
            .limit
            .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX))
            .unwrap_or(-1);
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        run(|| async move {
            self.db
                .read(move |conn| {
                    let mut stmt = conn.prepare(
                        "SELECT profile_id, last_viewed_at, display_name, x_username
                         FROM view_history
                         ORDER BY last_viewed_at DESC, rowid DESC
                         LIMIT ?1 OFFSET ?2",
                    )?;

                    let records = stmt
                        .query_map([limit, offset], ViewHistoryRecord::from_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;

                    Ok(records)
                })
                .await
        })
        .await
    }

    pub async fn count(&self) -> OfflineResult<usize> {
        run(|| async move {
            self.db
                .read(|conn| {
                    let count: i64 =
                        conn.query_row("SELECT COUNT(*) FROM view_history", [], |row| row.get(0))?;
                    Ok(count as usize)
                })
                .await
        })
        .await
    }

    /// Clear all history
    pub async fn clear(&self) -> OfflineResult<()> {
        run(|| async move {
            self.db
                .write(|conn| {
                    let removed = conn.execute("DELETE FROM view_history", [])?;
                    tracing::info!(removed, "Cleared view history");
                    Ok(())
                })
                .await
        })
        .await
    }
}

/// Deletes the least recently viewed entry, ties broken by insertion order.
fn evict_oldest(conn: &rusqlite::Connection) -> kemotag_storage::Result<()> {
    let oldest: Option<String> = conn
        .query_row(
            "SELECT profile_id FROM view_history ORDER BY last_viewed_at ASC, rowid ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(profile_id) = oldest {
        conn.execute("DELETE FROM view_history WHERE profile_id = ?1", [&profile_id])?;
        tracing::debug!(profile_id = %profile_id, "Evicted oldest view history entry");
    }

    Ok(())
}

impl Clone for ViewHistoryStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
