//! In-memory [`TransactionalStore`].
//!
//! Each transaction works on a copy of the current state, which replaces the
//! committed state only when the closure succeeds.

use crate::error::StorageError;
use crate::unit_of_work::{RecordKind, TransactionalStore, UnitOfWork};
use quizbank_parser::Question;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Committed contents of a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub questions: Vec<Question>,
    pub quiz_results: usize,
    pub wrong_answers: usize,
    pub loads: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemorySnapshot>,
    rejected_purge: Option<RecordKind>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot.
    pub fn with_snapshot(snapshot: MemorySnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
            rejected_purge: None,
        }
    }

    /// Makes every purge of `kind` fail, as a store with a broken
    /// connection or a locked table would.
    pub fn reject_purge_of(mut self, kind: RecordKind) -> Self {
        self.rejected_purge = Some(kind);
        self
    }

    /// Copy of the committed state.
    pub fn snapshot(&self) -> Result<MemorySnapshot, StorageError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemorySnapshot>, StorageError> {
        self.state
            .lock()
            .map_err(|e: PoisonError<MutexGuard<MemorySnapshot>>| StorageError::LockPoisoned(e.to_string()))
    }
}

impl TransactionalStore for MemoryStore {
    fn with_transaction<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, StorageError>,
    {
        let mut committed = self.lock()?;

        let mut uow = MemoryUnitOfWork {
            working: committed.clone(),
            rejected_purge: self.rejected_purge,
        };

        let value = f(&mut uow)?;
        *committed = uow.working;
        debug!("Committed in-memory transaction");
        Ok(value)
    }
}

struct MemoryUnitOfWork {
    working: MemorySnapshot,
    rejected_purge: Option<RecordKind>,
}

impl UnitOfWork for MemoryUnitOfWork {
    fn delete_all(&mut self, kind: RecordKind) -> Result<usize, StorageError> {
        if self.rejected_purge == Some(kind) {
            return Err(StorageError::Rejected {
                kind,
                reason: "purge refused".to_string(),
            });
        }

        let removed = match kind {
            RecordKind::QuizResult => std::mem::take(&mut self.working.quiz_results),
            RecordKind::WrongAnswer => std::mem::take(&mut self.working.wrong_answers),
            RecordKind::BaseQuestion => {
                if self.working.wrong_answers > 0 {
                    return Err(StorageError::Rejected {
                        kind,
                        reason: format!("{} wrong answers still reference questions", self.working.wrong_answers),
                    });
                }
                std::mem::take(&mut self.working.questions).len()
            }
        };
        Ok(removed)
    }

    fn persist(&mut self, question: &Question) -> Result<(), StorageError> {
        if self.working.questions.iter().any(|q| q.key() == question.key()) {
            return Err(StorageError::DuplicateKey(question.key().to_string()));
        }
        self.working.questions.push(question.clone());
        Ok(())
    }

    fn record_load(&mut self, _question_count: usize) -> Result<(), StorageError> {
        self.working.loads += 1;
        Ok(())
    }
}
