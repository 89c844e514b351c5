//! Database Schema
//!
//! The `App` table holds one row per credential record.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    let has_schema: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='metadata'",
        [],
        |row| row.get(0),
    )?;

    if !has_schema {
        create_schema(conn)?;
    }

    Ok(())
}

fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        r#"
        BEGIN;

        CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS App (
            id TEXT PRIMARY KEY,
            appName TEXT NOT NULL,
            userName TEXT NOT NULL,
            password TEXT NOT NULL,
            isPasswordVisible INTEGER NOT NULL DEFAULT 0,
            createdAt TEXT NOT NULL,
            updatedAt TEXT NOT NULL
        );

        INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', '{}');

        COMMIT;
        "#,
        SCHEMA_VERSION
    ))
}

/// Get current schema version
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i32> {
    let version: String = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .unwrap_or_else(|_| "0".to_string());

    Ok(version.parse().unwrap_or(0))
}
