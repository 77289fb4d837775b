//! View history records

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use kemotag_storage::from_millis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewHistoryRecord {
    pub profile_id: String,
    pub last_viewed_at: DateTime<Utc>,
    /// Snapshot taken when the view was recorded; not kept in sync
    pub display_name: String,
    pub x_username: String,
}

impl ViewHistoryRecord {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let last_viewed_at: i64 = row.get(1)?;

        Ok(Self {
            profile_id: row.get(0)?,
            last_viewed_at: from_millis(last_viewed_at),
            display_name: row.get(2)?,
            x_username: row.get(3)?,
        })
    }
}

/// A view to record; the timestamp is assigned on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewViewHistoryEntry {
    pub profile_id: String,
    pub display_name: String,
    pub x_username: String,
}

impl NewViewHistoryEntry {
    pub fn new(
        profile_id: impl Into<String>,
        display_name: impl Into<String>,
        x_username: impl Into<String>,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            display_name: display_name.into(),
            x_username: x_username.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewHistoryQuery {
    /// `None` means no limit
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl ViewHistoryQuery {
    pub fn page(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }
}
