use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Open the database at `path`, creating the parent directory and the
/// `Persona` table on first use. The caller owns the returned connection and
/// releases it by dropping it.
pub fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    debug!(path = %path.display(), "opening database connection");
    let conn = Connection::open(path).map_err(|source| StoreError::Connect {
        path: path.to_path_buf(),
        source,
    })?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `Persona` table when it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Persona (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            apellidos TEXT NOT NULL,
            edad INTEGER NOT NULL CHECK (edad >= 0)
        )",
        [],
    )
    .map_err(|source| StoreError::Query {
        context: "failed to create Persona table",
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories_and_table() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("personas.sqlite");

        let conn = open_connection(&path).expect("open database");
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'Persona'",
                [],
                |row| row.get(0),
            )
            .expect("query schema");

        assert_eq!(count, 1);
        assert!(path.exists());
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = Connection::open_in_memory().expect("in-memory database");
        ensure_schema(&conn).expect("first run");
        ensure_schema(&conn).expect("second run");
    }

    #[test]
    fn unusable_path_is_a_store_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = open_connection(dir.path()).expect_err("a directory is not a database");
        assert!(matches!(
            err,
            StoreError::Connect { .. } | StoreError::Query { .. }
        ));
    }
}
