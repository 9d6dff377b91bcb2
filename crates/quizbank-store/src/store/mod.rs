//! SQLite-based storage for the question bank.
//!
//! This module provides the `QuestionStore` type, which holds the questions
//! together with the quiz results and wrong answers that reference them.

mod metadata;
mod questions;
mod transaction;

use crate::error::StorageError;
use crate::schema::init_schema;
use quizbank_parser::QuestionKind;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use metadata::LastLoad;

/// The main storage interface for the question bank.
pub struct QuestionStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl QuestionStore {
    /// Open or create a question database at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;

        // WAL keeps readers on the committed snapshot while a load runs.
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: path.to_path_buf(),
        })
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: PathBuf::from(":memory:"),
        })
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|e: PoisonError<MutexGuard<Connection>>| StorageError::LockPoisoned(e.to_string()))
    }

    /// Helper function to safely acquire the connection lock with proper error handling.
    pub(crate) fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Get question bank statistics.
    pub fn get_stats(&self) -> Result<StoreStats, StorageError> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM questions WHERE kind = 'FREE') as free_count,
                    (SELECT COUNT(*) FROM questions WHERE kind = 'RADIO') as radio_count,
                    (SELECT COUNT(*) FROM questions WHERE kind = 'CHECK') as check_count,
                    (SELECT COUNT(*) FROM quiz_results) as result_count,
                    (SELECT COUNT(*) FROM wrong_answers) as wrong_count",
                [],
                |row| {
                    Ok(StoreStats {
                        free_count: row.get::<_, i64>(0)? as usize,
                        radio_count: row.get::<_, i64>(1)? as usize,
                        check_count: row.get::<_, i64>(2)? as usize,
                        quiz_result_count: row.get::<_, i64>(3)? as usize,
                        wrong_answer_count: row.get::<_, i64>(4)? as usize,
                    })
                },
            )?;
            Ok(stats)
        })
    }
}

/// Statistics about the question bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub free_count: usize,
    pub radio_count: usize,
    pub check_count: usize,
    pub quiz_result_count: usize,
    pub wrong_answer_count: usize,
}

impl StoreStats {
    pub fn question_count(&self) -> usize {
        self.free_count + self.radio_count + self.check_count
    }

    pub fn count_of(&self, kind: QuestionKind) -> usize {
        match kind {
            QuestionKind::Free => self.free_count,
            QuestionKind::Radio => self.radio_count,
            QuestionKind::Check => self.check_count,
        }
    }
}
