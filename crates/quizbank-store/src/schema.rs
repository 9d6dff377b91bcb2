use crate::error::StorageError;
use quizbank_parser::{Question, QuestionKind};
use rusqlite::{Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        r#"
        -- Metadata table for schema versioning and load history
        CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Question bank. Columns in use depend on the kind.
        CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_key TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL CHECK (kind IN ('FREE', 'RADIO', 'CHECK')),
            answer TEXT,
            answer_keys_json TEXT,
            right_answer_key TEXT,
            right_answer_keys_json TEXT,
            CHECK (
                (kind = 'FREE'
                    AND answer IS NOT NULL
                    AND answer_keys_json IS NULL
                    AND right_answer_key IS NULL
                    AND right_answer_keys_json IS NULL)
                OR (kind = 'RADIO'
                    AND answer IS NULL
                    AND answer_keys_json IS NOT NULL
                    AND right_answer_key IS NOT NULL
                    AND right_answer_keys_json IS NULL)
                OR (kind = 'CHECK'
                    AND answer IS NULL
                    AND answer_keys_json IS NOT NULL
                    AND right_answer_key IS NULL
                    AND right_answer_keys_json IS NOT NULL)
            )
        );

        -- Results of taken quizzes
        CREATE TABLE IF NOT EXISTS quiz_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            participant TEXT NOT NULL,
            score INTEGER NOT NULL,
            taken_at INTEGER NOT NULL
        );

        -- Wrong answers given during a quiz. No cascade from questions:
        -- these must be purged before the questions they point at.
        CREATE TABLE IF NOT EXISTS wrong_answers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            quiz_result_id INTEGER,
            question_id INTEGER NOT NULL,
            given_answer TEXT,
            FOREIGN KEY (quiz_result_id) REFERENCES quiz_results(id) ON DELETE CASCADE,
            FOREIGN KEY (question_id) REFERENCES questions(id)
        );

        CREATE INDEX IF NOT EXISTS idx_questions_kind ON questions(kind);
        CREATE INDEX IF NOT EXISTS idx_wrong_answers_result ON wrong_answers(quiz_result_id);
        CREATE INDEX IF NOT EXISTS idx_wrong_answers_question ON wrong_answers(question_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

/// A `questions` row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRow {
    pub id: i64,
    pub question_key: String,
    pub kind: String,
    pub answer: Option<String>,
    pub answer_keys_json: Option<String>,
    pub right_answer_key: Option<String>,
    pub right_answer_keys_json: Option<String>,
}

impl QuestionRow {
    pub fn into_question(self) -> Result<Question, StorageError> {
        let kind = QuestionKind::from_tag(&self.kind).ok_or_else(|| {
            StorageError::CorruptRow(format!("{}: unknown kind '{}'", self.question_key, self.kind))
        })?;

        let key = self.question_key;
        let missing = |column: &str| StorageError::CorruptRow(format!("{}: missing {}", key, column));

        let question = match kind {
            QuestionKind::Free => Question::Free {
                answer: self.answer.ok_or_else(|| missing("answer"))?,
                key,
            },
            QuestionKind::Radio => Question::Radio {
                choices: decode_keys(self.answer_keys_json.as_deref().ok_or_else(|| missing("answer_keys_json"))?)?,
                right_choice: self.right_answer_key.ok_or_else(|| missing("right_answer_key"))?,
                key,
            },
            QuestionKind::Check => Question::Check {
                choices: decode_keys(self.answer_keys_json.as_deref().ok_or_else(|| missing("answer_keys_json"))?)?,
                right_choices: decode_keys(
                    self.right_answer_keys_json.as_deref().ok_or_else(|| missing("right_answer_keys_json"))?,
                )?,
                key,
            },
        };

        Ok(question)
    }
}

/// Column values for inserting a question, in `questions` column order
/// after `question_key`.
pub(crate) struct QuestionColumns {
    pub kind: &'static str,
    pub answer: Option<String>,
    pub answer_keys_json: Option<String>,
    pub right_answer_key: Option<String>,
    pub right_answer_keys_json: Option<String>,
}

impl QuestionColumns {
    pub(crate) fn from_question(question: &Question) -> Result<Self, StorageError> {
        let kind = question.kind().as_str();
        let columns = match question {
            Question::Free { answer, .. } => QuestionColumns {
                kind,
                answer: Some(answer.clone()),
                answer_keys_json: None,
                right_answer_key: None,
                right_answer_keys_json: None,
            },
            Question::Radio {
                choices,
                right_choice,
                ..
            } => QuestionColumns {
                kind,
                answer: None,
                answer_keys_json: Some(serde_json::to_string(choices)?),
                right_answer_key: Some(right_choice.clone()),
                right_answer_keys_json: None,
            },
            Question::Check {
                choices,
                right_choices,
                ..
            } => QuestionColumns {
                kind,
                answer: None,
                answer_keys_json: Some(serde_json::to_string(choices)?),
                right_answer_key: None,
                right_answer_keys_json: Some(serde_json::to_string(right_choices)?),
            },
        };
        Ok(columns)
    }
}

fn decode_keys(json: &str) -> Result<BTreeSet<String>, StorageError> {
    Ok(serde_json::from_str(json)?)
}
