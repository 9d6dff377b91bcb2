//! The store contract the loader runs against.
//!
//! A [`TransactionalStore`] hands out one [`UnitOfWork`] per call to
//! [`TransactionalStore::with_transaction`]. Everything done through the unit
//! of work becomes visible together on commit, or not at all.

use crate::error::StorageError;
use quizbank_parser::Question;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record collections a purge removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordKind {
    QuizResult,
    WrongAnswer,
    BaseQuestion,
}

impl RecordKind {
    /// Dependents first, so no row ever references a deleted question.
    pub const PURGE_ORDER: [RecordKind; 3] = [
        RecordKind::QuizResult,
        RecordKind::WrongAnswer,
        RecordKind::BaseQuestion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::QuizResult => "QuizResult",
            RecordKind::WrongAnswer => "WrongAnswer",
            RecordKind::BaseQuestion => "BaseQuestion",
        }
    }

    /// SQLite table backing this record kind.
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::QuizResult => "quiz_results",
            RecordKind::WrongAnswer => "wrong_answers",
            RecordKind::BaseQuestion => "questions",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations available inside an open transaction.
pub trait UnitOfWork {
    /// Deletes every record of `kind`, returning how many were removed.
    fn delete_all(&mut self, kind: RecordKind) -> Result<usize, StorageError>;

    /// Persists one question.
    fn persist(&mut self, question: &Question) -> Result<(), StorageError>;

    /// Notes a completed load of `question_count` questions. Stores that keep
    /// no load history ignore it.
    fn record_load(&mut self, _question_count: usize) -> Result<(), StorageError> {
        Ok(())
    }
}

/// A store that can run a closure as one atomic unit of work.
pub trait TransactionalStore {
    /// Begins a transaction, runs `f`, and commits if it returns `Ok`.
    /// Any `Err`, from `f` or from the commit itself, rolls everything back.
    fn with_transaction<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, StorageError>;
}
