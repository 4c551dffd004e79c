use crate::utils::error::{EtlError, Result};
use rusqlite::Connection;
use std::path::Path;

pub const CREATE_USERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        description TEXT NOT NULL,
        processed_at TEXT NOT NULL
    );";

pub const INSERT_USER: &str = "
    INSERT INTO users (id, name, email, description, processed_at)
    VALUES (?1, ?2, ?3, ?4, ?5)";

/// Opens (creating if needed) the SQLite file at `path`.
pub fn open_connection(path: &Path) -> Result<Connection> {
    Connection::open(path).map_err(|source| EtlError::StoreConnectionError {
        path: path.to_path_buf(),
        source,
    })
}

/// Recreates the destination `users` table from scratch.
pub struct StoreInitializer;

impl StoreInitializer {
    pub fn reset(path: &Path) -> Result<()> {
        if path.is_file() {
            std::fs::remove_file(path).map_err(|source| EtlError::FileAccessError {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!("Removed previous database {}", path.display());
        }

        let mut conn = open_connection(path)?;
        let tx = conn.transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS users;")?;
        tx.execute_batch(CREATE_USERS_TABLE)?;
        tx.commit()?;

        tracing::info!("Table users created in {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_users(path: &Path) -> i64 {
        let conn = Connection::open(path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_reset_creates_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("users.db");

        StoreInitializer::reset(&db).unwrap();

        assert!(db.is_file());
        assert_eq!(count_users(&db), 0);
    }

    #[test]
    fn test_reset_drops_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("users.db");

        StoreInitializer::reset(&db).unwrap();
        {
            let conn = Connection::open(&db).unwrap();
            conn.execute(INSERT_USER, rusqlite::params![1, "a", "a@b.c", "d", "now"])
                .unwrap();
        }
        assert_eq!(count_users(&db), 1);

        StoreInitializer::reset(&db).unwrap();
        assert_eq!(count_users(&db), 0);
    }

    #[test]
    fn test_schema_enforces_not_null() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("users.db");
        StoreInitializer::reset(&db).unwrap();

        let conn = Connection::open(&db).unwrap();
        let err = conn
            .execute(
                INSERT_USER,
                rusqlite::params![1, Option::<String>::None, "a@b.c", "d", "now"],
            )
            .unwrap_err();
        assert!(matches!(
            EtlError::from(err),
            EtlError::ConstraintViolationError { .. }
        ));
    }

    #[test]
    fn test_reset_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nope").join("users.db");

        let err = StoreInitializer::reset(&db).unwrap_err();
        assert!(matches!(err, EtlError::StoreConnectionError { .. }));
    }
}
