//! Database Queries
//!
//! Parameterized queries for CRUD operations on the `App` table.

use chrono::{DateTime, Local};
use rusqlite::{params, types::Type, Connection, Row};

use super::{
    models::{Record, RecordId},
    StoreError, StoreResult,
};

const RECORD_COLUMNS: &str =
    "id, appName, userName, password, isPasswordVisible, createdAt, updatedAt";

/// Insert a new record
pub fn insert_record(conn: &Connection, record: &Record) -> StoreResult<()> {
    conn.execute(
        r#"
        INSERT INTO App (id, appName, userName, password, isPasswordVisible, createdAt, updatedAt)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            record.id.as_str(),
            record.app_name,
            record.user_name,
            record.password,
            record.is_password_visible,
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339(),
        ],
    )
    .map_err(StoreError::write)?;

    Ok(())
}

/// Get a record by ID
pub fn get_record(conn: &Connection, id: &RecordId) -> StoreResult<Record> {
    conn.query_row(
        &format!("SELECT {} FROM App WHERE id = ?1", RECORD_COLUMNS),
        [id.as_str()],
        row_to_record,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(id.to_string()),
        _ => StoreError::read(e),
    })
}

/// Get all records in insertion order
pub fn get_all_records(conn: &Connection) -> StoreResult<Vec<Record>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {} FROM App ORDER BY rowid", RECORD_COLUMNS))
        .map_err(StoreError::read)?;

    let records = stmt
        .query_map([], row_to_record)
        .map_err(StoreError::read)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::read)?;

    Ok(records)
}

/// Get records whose ID starts with `prefix`
pub fn get_records_by_id_prefix(conn: &Connection, prefix: &str) -> StoreResult<Vec<Record>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM App WHERE substr(id, 1, length(?1)) = ?1 ORDER BY rowid",
            RECORD_COLUMNS
        ))
        .map_err(StoreError::read)?;

    let records = stmt
        .query_map([prefix], row_to_record)
        .map_err(StoreError::read)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(StoreError::read)?;

    Ok(records)
}

/// Overwrite the editable fields of a record
pub fn update_record_fields(
    conn: &Connection,
    id: &RecordId,
    app_name: &str,
    user_name: &str,
    password: &str,
) -> StoreResult<()> {
    let rows = conn
        .execute(
            r#"
            UPDATE App
            SET appName = ?2, userName = ?3, password = ?4, updatedAt = ?5
            WHERE id = ?1
            "#,
            params![id.as_str(), app_name, user_name, password, Local::now().to_rfc3339()],
        )
        .map_err(StoreError::write)?;

    if rows == 0 {
        return Err(StoreError::NotFound(id.to_string()));
    }

    Ok(())
}

/// Persist the password visibility preference
pub fn set_record_visibility(conn: &Connection, id: &RecordId, visible: bool) -> StoreResult<()> {
    let rows = conn
        .execute(
            "UPDATE App SET isPasswordVisible = ?2 WHERE id = ?1",
            params![id.as_str(), visible],
        )
        .map_err(StoreError::write)?;

    if rows == 0 {
        return Err(StoreError::NotFound(id.to_string()));
    }

    Ok(())
}

/// Delete a record
pub fn delete_record(conn: &Connection, id: &RecordId) -> StoreResult<()> {
    let rows = conn
        .execute("DELETE FROM App WHERE id = ?1", [id.as_str()])
        .map_err(StoreError::write)?;

    if rows == 0 {
        return Err(StoreError::NotFound(id.to_string()));
    }

    Ok(())
}

fn row_to_record(row: &Row) -> rusqlite::Result<Record> {
    Ok(Record {
        id: RecordId::from(row.get::<_, String>(0)?),
        app_name: row.get(1)?,
        user_name: row.get(2)?,
        password: row.get(3)?,
        is_password_visible: row.get(4)?,
        created_at: parse_datetime(5, row.get::<_, String>(5)?)?,
        updated_at: parse_datetime(6, row.get::<_, String>(6)?)?,
    })
}

fn parse_datetime(column: usize, s: String) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
