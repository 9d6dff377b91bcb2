//! Parse error types.
//!
//! Every variant carries the 1-based line number of the offending line in
//! the payload, counted before empty lines are dropped.

use crate::question::QuestionKind;
use thiserror::Error;

/// Errors raised while turning a payload into questions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A line has the wrong number of fields for its declared kind.
    #[error("line {line_number}: {kind} question needs {expected} fields, found {found}: {line}")]
    Validation {
        line_number: usize,
        line: String,
        kind: QuestionKind,
        expected: usize,
        found: usize,
    },

    /// The type tag does not name a known question kind.
    #[error("line {line_number}: type '{tag}' is not known")]
    UnknownType { line_number: usize, tag: String },

    /// A right answer is not among the offered choices (strict mode only).
    #[error("line {line_number}: answer '{answer}' of question '{key}' is not one of its choices")]
    AnswerNotOffered {
        line_number: usize,
        key: String,
        answer: String,
    },
}

impl ParseError {
    pub fn line_number(&self) -> usize {
        match self {
            ParseError::Validation { line_number, .. }
            | ParseError::UnknownType { line_number, .. }
            | ParseError::AnswerNotOffered { line_number, .. } => *line_number,
        }
    }
}
