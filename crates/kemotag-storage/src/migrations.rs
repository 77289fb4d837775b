//! Database migrations
//!
//! Schema v1: bookmarks (soft-deletable) and view_history (bounded log)

use crate::constants::DB_VERSION;
use crate::error::StorageError;
use crate::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version > DB_VERSION {
        return Err(StorageError::SchemaTooNew {
            found: current_version,
            supported: DB_VERSION,
        });
    }

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    set_schema_version(conn, DB_VERSION)?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let result = conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get(0)
    });

    match result {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1: bookmarks and view history");

    // Soft delete keeps the row; deleted_at NULL means active
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bookmarks (
            profile_id TEXT PRIMARY KEY,
            deleted_at INTEGER,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS by_deleted_at ON bookmarks(deleted_at);
    "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS view_history (
            profile_id TEXT PRIMARY KEY,
            last_viewed_at INTEGER NOT NULL,
            display_name TEXT NOT NULL,
            x_username TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS by_last_viewed ON view_history(last_viewed_at);
    "#,
    )?;

    Ok(())
}
