//! Unit-of-work support for QuestionStore.

use super::QuestionStore;
use crate::error::StorageError;
use crate::unit_of_work::{RecordKind, TransactionalStore, UnitOfWork};
use quizbank_parser::Question;
use rusqlite::Connection;
use tracing::debug;

/// Operations bound to an open `BEGIN IMMEDIATE` transaction.
struct SqliteUnitOfWork<'conn> {
    conn: &'conn Connection,
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn delete_all(&mut self, kind: RecordKind) -> Result<usize, StorageError> {
        QuestionStore::delete_all_impl(self.conn, kind)
    }

    fn persist(&mut self, question: &Question) -> Result<(), StorageError> {
        QuestionStore::insert_question_impl(self.conn, question)?;
        Ok(())
    }

    fn record_load(&mut self, question_count: usize) -> Result<(), StorageError> {
        QuestionStore::set_last_load_impl(self.conn, question_count)
    }
}

impl TransactionalStore for QuestionStore {
    fn with_transaction<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, StorageError>,
    {
        let conn = self.lock()?;

        // IMMEDIATE takes the write lock up front so concurrent loads queue
        // behind busy_timeout instead of interleaving their purges.
        conn.execute("BEGIN IMMEDIATE", [])?;

        let mut uow = SqliteUnitOfWork { conn: &conn };
        let result = f(&mut uow);

        match result {
            Ok(value) => {
                if let Err(e) = conn.execute("COMMIT", []) {
                    let _ = conn.execute("ROLLBACK", []);
                    return Err(e.into());
                }
                debug!("Transaction committed");
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                debug!("Transaction rolled back: {}", e);
                Err(e)
            }
        }
    }
}
