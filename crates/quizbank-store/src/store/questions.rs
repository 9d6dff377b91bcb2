//! Question operations for QuestionStore.

use super::QuestionStore;
use crate::error::StorageError;
use crate::schema::{QuestionColumns, QuestionRow};
use crate::unit_of_work::RecordKind;
use quizbank_parser::Question;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

const SELECT_QUESTION: &str = "SELECT id, question_key, kind, answer, answer_keys_json, right_answer_key, right_answer_keys_json
     FROM questions";

impl QuestionStore {
    /// All stored questions in insertion order.
    pub fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_QUESTION} ORDER BY id"))?;

            let rows = stmt
                .query_map([], Self::map_question_row)?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter().map(QuestionRow::into_question).collect()
        })
    }

    /// Get a question by its key.
    pub fn get_question(&self, key: &str) -> Result<Option<Question>, StorageError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("{SELECT_QUESTION} WHERE question_key = ?1"),
                    [key],
                    Self::map_question_row,
                )
                .optional()?;

            row.map(QuestionRow::into_question).transpose()
        })
    }

    fn map_question_row(row: &Row<'_>) -> rusqlite::Result<QuestionRow> {
        Ok(QuestionRow {
            id: row.get(0)?,
            question_key: row.get(1)?,
            kind: row.get(2)?,
            answer: row.get(3)?,
            answer_keys_json: row.get(4)?,
            right_answer_key: row.get(5)?,
            right_answer_keys_json: row.get(6)?,
        })
    }

    /// Internal implementation for use within a transaction.
    pub(crate) fn insert_question_impl(conn: &Connection, question: &Question) -> Result<i64, StorageError> {
        let columns = QuestionColumns::from_question(question)?;

        let mut stmt = conn.prepare_cached(
            "INSERT INTO questions (question_key, kind, answer, answer_keys_json, right_answer_key, right_answer_keys_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        stmt.execute(params![
            question.key(),
            columns.kind,
            columns.answer,
            columns.answer_keys_json,
            columns.right_answer_key,
            columns.right_answer_keys_json,
        ])
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StorageError::DuplicateKey(question.key().to_string())
            }
            other => StorageError::Sqlite(other),
        })?;

        let id = conn.last_insert_rowid();
        debug!("Inserted question {} with id {}", question.key(), id);
        Ok(id)
    }

    /// Internal implementation for use within a transaction.
    pub(crate) fn delete_all_impl(conn: &Connection, kind: RecordKind) -> Result<usize, StorageError> {
        let deleted = conn.execute(&format!("DELETE FROM {}", kind.table()), [])?;
        debug!("Deleted {} rows from {}", deleted, kind.table());
        Ok(deleted)
    }
}
