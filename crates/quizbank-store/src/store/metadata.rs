//! Load history kept in the metadata table.

use super::QuestionStore;
use crate::error::StorageError;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Summary of the most recent committed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastLoad {
    /// Seconds since the UNIX epoch.
    pub loaded_at: i64,
    pub question_count: usize,
}

impl QuestionStore {
    /// The most recent committed load, if any.
    pub fn last_load(&self) -> Result<Option<LastLoad>, StorageError> {
        self.with_conn(|conn| {
            let value: Option<String> = conn
                .query_row("SELECT value FROM metadata WHERE key = 'last_load'", [], |row| {
                    row.get(0)
                })
                .optional()?;

            value
                .map(|v| serde_json::from_str(&v).map_err(StorageError::from))
                .transpose()
        })
    }

    /// Internal implementation for use within a transaction.
    pub(crate) fn set_last_load_impl(conn: &Connection, question_count: usize) -> Result<(), StorageError> {
        let loaded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let value = serde_json::to_string(&LastLoad {
            loaded_at,
            question_count,
        })?;

        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES ('last_load', ?1)",
            [value],
        )?;
        Ok(())
    }
}
