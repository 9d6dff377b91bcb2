//! Purge-and-reload of the whole question bank.
//!
//! A load runs `Idle → Purging → Inserting → Committed`. A failure while
//! purging or inserting rolls the transaction back, leaving the store exactly
//! as it was before the call.

use crate::error::StorageError;
use crate::unit_of_work::{RecordKind, TransactionalStore};
use quizbank_parser::{ParseError, ParseOptions, Question, parse_bytes_with};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Lifecycle of one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Purging,
    Inserting,
    Committed,
    RolledBack,
}

impl LoadPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadPhase::Idle => "idle",
            LoadPhase::Purging => "purging",
            LoadPhase::Inserting => "inserting",
            LoadPhase::Committed => "committed",
            LoadPhase::RolledBack => "rolled back",
        }
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid payload: {0}")]
    Parse(#[from] ParseError),

    #[error("load failed while {phase}, changes rolled back: {source}")]
    Storage {
        phase: LoadPhase,
        #[source]
        source: StorageError,
    },
}

impl LoadError {
    /// Where the store ended up. A payload that fails to parse never
    /// touches the store.
    pub fn final_phase(&self) -> LoadPhase {
        match self {
            LoadError::Parse(_) => LoadPhase::Idle,
            LoadError::Storage { .. } => LoadPhase::RolledBack,
        }
    }
}

/// Outcome of a committed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Records removed per kind, in purge order.
    pub purged: Vec<(RecordKind, usize)>,
    pub inserted: usize,
}

impl LoadReport {
    pub fn purged_count(&self, kind: RecordKind) -> usize {
        self.purged
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Replaces every question in `store` with `questions` in one unit of work.
///
/// Dependent records are deleted before the questions they reference. The
/// questions are then persisted in the given order.
pub fn replace_all<S: TransactionalStore>(store: &S, questions: &[Question]) -> Result<LoadReport, LoadError> {
    let mut phase = LoadPhase::Idle;

    let result = store.with_transaction(|uow| {
        phase = LoadPhase::Purging;
        let mut purged = Vec::with_capacity(RecordKind::PURGE_ORDER.len());
        for kind in RecordKind::PURGE_ORDER {
            let count = uow.delete_all(kind)?;
            debug!("Purged {} {} records", count, kind);
            purged.push((kind, count));
        }

        phase = LoadPhase::Inserting;
        for question in questions {
            uow.persist(question)?;
            debug!("Persisted {} question {}", question.kind(), question.key());
        }
        uow.record_load(questions.len())?;

        Ok(purged)
    });

    match result {
        Ok(purged) => {
            info!("Question bank replaced: {} questions loaded", questions.len());
            Ok(LoadReport {
                purged,
                inserted: questions.len(),
            })
        }
        Err(source) => {
            warn!("Load failed while {}, rolled back: {}", phase, source);
            Err(LoadError::Storage { phase, source })
        }
    }
}

/// Parses a raw payload and replaces the question bank with it.
///
/// The payload is fully parsed before the transaction opens, so a bad line
/// never reaches the store.
pub fn load_payload<S: TransactionalStore>(
    store: &S,
    bytes: &[u8],
    options: ParseOptions,
) -> Result<LoadReport, LoadError> {
    let questions = parse_bytes_with(bytes, options)?;
    replace_all(store, &questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySnapshot, MemoryStore};
    use quizbank_parser::parse;

    const PAYLOAD: &str = "FREE;q1;Paris\nRADIO;q2;a,b,c;b\nCHECK;q3;x,y,z;x,z\n";

    fn seeded_store() -> MemoryStore {
        MemoryStore::with_snapshot(MemorySnapshot {
            questions: parse("FREE;old1;x\nFREE;old2;y").unwrap(),
            quiz_results: 2,
            wrong_answers: 3,
            loads: 1,
        })
    }

    #[test]
    fn test_load_replaces_everything() {
        let store = seeded_store();

        let report = load_payload(&store, PAYLOAD.as_bytes(), ParseOptions::default()).unwrap();
        assert_eq!(report.inserted, 3);
        assert_eq!(
            report.purged,
            vec![
                (RecordKind::QuizResult, 2),
                (RecordKind::WrongAnswer, 3),
                (RecordKind::BaseQuestion, 2),
            ]
        );

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.questions, parse(PAYLOAD).unwrap());
        assert_eq!(snapshot.quiz_results, 0);
        assert_eq!(snapshot.wrong_answers, 0);
        assert_eq!(snapshot.loads, 2);
    }

    #[test]
    fn test_load_is_idempotent() {
        let store = seeded_store();

        load_payload(&store, PAYLOAD.as_bytes(), ParseOptions::default()).unwrap();
        let first = store.snapshot().unwrap().questions;
        let report = load_payload(&store, PAYLOAD.as_bytes(), ParseOptions::default()).unwrap();
        let second = store.snapshot().unwrap().questions;

        assert_eq!(first, second);
        assert_eq!(report.purged_count(RecordKind::BaseQuestion), 3);
    }

    #[test]
    fn test_parse_failure_leaves_store_untouched() {
        let store = seeded_store();
        let before = store.snapshot().unwrap();

        let err = load_payload(&store, b"FREE;q1;Paris\nESSAY;k;x", ParseOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Parse(ParseError::UnknownType { .. })));
        assert_eq!(err.final_phase(), LoadPhase::Idle);

        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_duplicate_key_rolls_back() {
        let store = seeded_store();
        let before = store.snapshot().unwrap();

        let err = load_payload(&store, b"FREE;q1;a\nFREE;q2;b\nFREE;q1;c", ParseOptions::default()).unwrap_err();
        match &err {
            LoadError::Storage { phase, source } => {
                assert_eq!(*phase, LoadPhase::Inserting);
                assert!(matches!(source, StorageError::DuplicateKey(key) if key == "q1"));
            }
            other => panic!("expected storage error, got {other:?}"),
        }
        assert_eq!(err.final_phase(), LoadPhase::RolledBack);

        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_purge_failure_rolls_back() {
        let store = seeded_store().reject_purge_of(RecordKind::WrongAnswer);
        let before = store.snapshot().unwrap();

        let err = replace_all(&store, &parse(PAYLOAD).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Storage {
                phase: LoadPhase::Purging,
                source: StorageError::Rejected {
                    kind: RecordKind::WrongAnswer,
                    ..
                },
            }
        ));

        // Quiz results were deleted inside the transaction; rollback restores them.
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn test_empty_payload_empties_the_bank() {
        let store = seeded_store();

        let report = load_payload(&store, b"\n\n", ParseOptions::default()).unwrap();
        assert_eq!(report.inserted, 0);
        assert!(store.snapshot().unwrap().questions.is_empty());
    }

    #[test]
    fn test_strict_options_reach_the_parser() {
        let store = MemoryStore::new();

        let err = load_payload(&store, b"RADIO;k;a,b;z", ParseOptions::strict()).unwrap_err();
        assert!(matches!(err, LoadError::Parse(ParseError::AnswerNotOffered { .. })));

        load_payload(&store, b"RADIO;k;a,b;z", ParseOptions::default()).unwrap();
        assert_eq!(store.snapshot().unwrap().questions.len(), 1);
    }
}
