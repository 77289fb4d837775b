//! Bookmark record

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use kemotag_storage::from_millis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    /// Referenced profile, unique per record
    pub profile_id: String,
    /// `None` while active, otherwise when it was unsaved
    pub deleted_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl BookmarkRecord {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let deleted_at: Option<i64> = row.get(1)?;
        let updated_at: i64 = row.get(2)?;

        Ok(Self {
            profile_id: row.get(0)?,
            deleted_at: deleted_at.map(from_millis),
            updated_at: from_millis(updated_at),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

impl BookmarkQuery {
    pub fn including_deleted() -> Self {
        Self {
            include_deleted: true,
        }
    }
}
