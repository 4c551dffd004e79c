use crate::adapters::sqlite::{open_connection, INSERT_USER};
use crate::core::{ConfigProvider, TransformedRecord};
use crate::utils::error::{EtlError, Result};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// What happened to the rows handed to the load stage.
///
/// Store-side failures are reported here instead of as an `Err`, so the
/// caller decides whether an abandoned load should fail the run.
#[derive(Debug)]
pub enum LoadOutcome {
    Committed { rows: usize },
    Abandoned { attempted: usize, error: EtlError },
}

impl LoadOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, LoadOutcome::Committed { .. })
    }

    pub fn rows_committed(&self) -> usize {
        match self {
            LoadOutcome::Committed { rows } => *rows,
            LoadOutcome::Abandoned { .. } => 0,
        }
    }

    /// Escalates an abandoned load into its error.
    pub fn into_result(self) -> Result<usize> {
        match self {
            LoadOutcome::Committed { rows } => Ok(rows),
            LoadOutcome::Abandoned { error, .. } => Err(error),
        }
    }
}

enum Failure {
    Upstream(EtlError),
    Store(EtlError),
}

impl From<rusqlite::Error> for Failure {
    fn from(err: rusqlite::Error) -> Self {
        Failure::Store(err.into())
    }
}

/// Load stage: inserts every transformed row into `users` in one transaction.
#[derive(Debug, Clone)]
pub struct Loader {
    db_path: PathBuf,
}

impl Loader {
    pub fn new<C: ConfigProvider>(config: &C) -> Self {
        Self::from_path(config.db_path())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            db_path: path.as_ref().to_path_buf(),
        }
    }

    /// Drains `rows` into the database.
    ///
    /// Rows are committed together only once the upstream is exhausted. A
    /// store error rolls back and yields [`LoadOutcome::Abandoned`]; an
    /// extract or transform error rolls back and is returned as `Err`. The
    /// connection is closed on every path.
    pub fn load<I>(&self, rows: I) -> Result<LoadOutcome>
    where
        I: IntoIterator<Item = Result<TransformedRecord>>,
    {
        tracing::info!("Load started: {}", self.db_path.display());

        let mut conn = match open_connection(&self.db_path) {
            Ok(conn) => conn,
            Err(error) => return Ok(Self::abandon(0, error)),
        };

        let mut attempted = 0;
        let result = Self::insert_all(&mut conn, rows, &mut attempted);
        drop(conn);
        tracing::debug!("Connection to {} released", self.db_path.display());

        match result {
            Ok(()) => {
                tracing::info!("Load finished: {} rows committed", attempted);
                Ok(LoadOutcome::Committed { rows: attempted })
            }
            Err(Failure::Store(error)) => Ok(Self::abandon(attempted, error)),
            Err(Failure::Upstream(error)) => {
                tracing::error!(
                    "Load aborted after {} rows, nothing committed: {}",
                    attempted,
                    error
                );
                Err(error)
            }
        }
    }

    fn insert_all<I>(
        conn: &mut Connection,
        rows: I,
        attempted: &mut usize,
    ) -> std::result::Result<(), Failure>
    where
        I: IntoIterator<Item = Result<TransformedRecord>>,
    {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_USER)?;
            for row in rows {
                let row = row.map_err(Failure::Upstream)?;
                *attempted += 1;
                tracing::debug!("Insert row {:?}", row);
                stmt.execute(params![
                    row.id,
                    row.name,
                    row.email,
                    row.description,
                    row.processed_at
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn abandon(attempted: usize, error: EtlError) -> LoadOutcome {
        tracing::error!("Database error: {}", error);
        LoadOutcome::Abandoned { attempted, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StoreInitializer;
    use chrono::{DateTime, Utc};

    fn record(id: i64, name: &str) -> TransformedRecord {
        TransformedRecord {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            description: "abc123".to_string(),
            processed_at: Utc::now(),
        }
    }

    fn fresh_db() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("users.db");
        StoreInitializer::reset(&db).unwrap();
        (dir, db)
    }

    fn loaded_ids(db: &Path) -> Vec<i64> {
        let conn = Connection::open(db).unwrap();
        let mut stmt = conn.prepare("SELECT id FROM users ORDER BY rowid").unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_load_commits_all_rows_in_order() {
        let (_dir, db) = fresh_db();
        let rows = vec![Ok(record(5, "E")), Ok(record(3, "C")), Ok(record(4, "D"))];

        let outcome = Loader::from_path(&db).load(rows).unwrap();

        assert!(outcome.is_committed());
        assert_eq!(outcome.rows_committed(), 3);
        assert_eq!(loaded_ids(&db), vec![5, 3, 4]);
    }

    #[test]
    fn test_processed_at_round_trips_as_utc() {
        let (_dir, db) = fresh_db();
        let row = record(1, "A");
        let stamp = row.processed_at;

        Loader::from_path(&db).load(vec![Ok(row)]).unwrap();

        let conn = Connection::open(&db).unwrap();
        let stored: DateTime<Utc> = conn
            .query_row("SELECT processed_at FROM users", [], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, stamp);
    }

    #[test]
    fn test_duplicate_ids_are_accepted() {
        let (_dir, db) = fresh_db();
        let outcome = Loader::from_path(&db)
            .load(vec![Ok(record(1, "A")), Ok(record(1, "B"))])
            .unwrap();

        assert_eq!(outcome.rows_committed(), 2);
        assert_eq!(loaded_ids(&db), vec![1, 1]);
    }

    #[test]
    fn test_upstream_error_rolls_back_everything() {
        let (_dir, db) = fresh_db();
        let rows = vec![
            Ok(record(0, "A")),
            Ok(record(1, "B")),
            Err(EtlError::ConversionError {
                field: "id".to_string(),
                value: "x".to_string(),
            }),
            Ok(record(3, "D")),
        ];

        let err = Loader::from_path(&db).load(rows).unwrap_err();

        assert!(matches!(err, EtlError::ConversionError { .. }));
        assert!(loaded_ids(&db).is_empty());
    }

    #[test]
    fn test_store_error_mid_stream_rolls_back_earlier_rows() {
        let (_dir, db) = fresh_db();
        Connection::open(&db)
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_id_one BEFORE INSERT ON users WHEN NEW.id = 1
                 BEGIN SELECT RAISE(ABORT, 'id 1 rejected'); END;",
            )
            .unwrap();
        let rows = vec![Ok(record(0, "A")), Ok(record(1, "B")), Ok(record(2, "C"))];

        let outcome = Loader::from_path(&db).load(rows).unwrap();

        match outcome {
            LoadOutcome::Abandoned { attempted, error } => {
                assert_eq!(attempted, 2);
                match error {
                    EtlError::ConstraintViolationError { message } => {
                        assert_eq!(message, "id 1 rejected")
                    }
                    other => panic!("unexpected error: {other:?}"),
                }
            }
            other => panic!("expected abandoned load, got {other:?}"),
        }
        let count: i64 = Connection::open(&db)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_unreachable_destination_is_abandoned() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("missing").join("users.db");

        let outcome = Loader::from_path(&db).load(vec![Ok(record(0, "A"))]).unwrap();

        match outcome {
            LoadOutcome::Abandoned { attempted, error } => {
                assert_eq!(attempted, 0);
                assert!(matches!(error, EtlError::StoreConnectionError { .. }));
            }
            other => panic!("expected abandoned load, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_table_is_abandoned_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("empty.db");

        let outcome = Loader::from_path(&db).load(vec![Ok(record(0, "A"))]).unwrap();

        assert!(!outcome.is_committed());
        assert_eq!(outcome.rows_committed(), 0);
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_empty_input_commits_nothing() {
        let (_dir, db) = fresh_db();
        let outcome = Loader::from_path(&db)
            .load(Vec::<Result<TransformedRecord>>::new())
            .unwrap();

        assert_eq!(outcome.into_result().unwrap(), 0);
        assert!(loaded_ids(&db).is_empty());
    }
}
