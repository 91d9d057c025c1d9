//! Database migrations

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate(conn, 1, MIGRATION_V1)?;
    }
    if version < 2 {
        migrate(conn, 2, MIGRATION_V2)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Apply `sql` and record `version` atomically
fn migrate(conn: &Connection, version: i32, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute("INSERT INTO schema_version (version) VALUES (?)", [version])?;
    tx.commit()?;

    tracing::info!("Migrated database to version {version}");
    Ok(())
}

/// Version 1: items table
const MIGRATION_V1: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    );
    CREATE TABLE IF NOT EXISTS items (
        id TEXT PRIMARY KEY,
        tier TEXT NOT NULL CHECK (tier IN ('article', 'category', 'file')),
        title TEXT NOT NULL,
        namespace TEXT NOT NULL,
        domain TEXT,
        markdown TEXT NOT NULL DEFAULT '',
        owner TEXT,
        allowed_editors TEXT,
        allowed_viewers TEXT,
        uploader TEXT,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        timestamp INTEGER NOT NULL
    );
";

/// Version 2: indexes for the per-tier search filters
const MIGRATION_V2: &str = "
    CREATE INDEX IF NOT EXISTS idx_items_tier_deleted ON items(tier, is_deleted);
    CREATE INDEX IF NOT EXISTS idx_items_domain ON items(domain);
    CREATE INDEX IF NOT EXISTS idx_items_owner ON items(owner);
    CREATE INDEX IF NOT EXISTS idx_items_uploader ON items(uploader);
    CREATE INDEX IF NOT EXISTS idx_items_timestamp ON items(timestamp DESC);
";
