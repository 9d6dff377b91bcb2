use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The three question variants a bank can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    Free,
    Radio,
    Check,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 3] = [QuestionKind::Free, QuestionKind::Radio, QuestionKind::Check];

    /// Resolves an already normalized tag (`FREE`, `RADIO`, `CHECK`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "FREE" => Some(QuestionKind::Free),
            "RADIO" => Some(QuestionKind::Radio),
            "CHECK" => Some(QuestionKind::Check),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Free => "FREE",
            QuestionKind::Radio => "RADIO",
            QuestionKind::Check => "CHECK",
        }
    }

    /// Number of `;`-separated fields a line of this kind must have,
    /// tag included.
    pub fn field_count(&self) -> usize {
        match self {
            QuestionKind::Free => 3,
            QuestionKind::Radio | QuestionKind::Check => 4,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single quiz question as described by one payload line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum Question {
    Free {
        key: String,
        answer: String,
    },
    Radio {
        key: String,
        choices: BTreeSet<String>,
        right_choice: String,
    },
    Check {
        key: String,
        choices: BTreeSet<String>,
        right_choices: BTreeSet<String>,
    },
}

impl Question {
    pub fn key(&self) -> &str {
        match self {
            Question::Free { key, .. } | Question::Radio { key, .. } | Question::Check { key, .. } => key,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Free { .. } => QuestionKind::Free,
            Question::Radio { .. } => QuestionKind::Radio,
            Question::Check { .. } => QuestionKind::Check,
        }
    }

    /// Offered choices; empty for free-text questions.
    pub fn choices(&self) -> Option<&BTreeSet<String>> {
        match self {
            Question::Free { .. } => None,
            Question::Radio { choices, .. } | Question::Check { choices, .. } => Some(choices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_tag() {
        for kind in QuestionKind::ALL {
            assert_eq!(QuestionKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(QuestionKind::from_tag("free"), None);
        assert_eq!(QuestionKind::from_tag("ESSAY"), None);
    }

    #[test]
    fn test_question_accessors() {
        let q = Question::Radio {
            key: "q2".to_string(),
            choices: ["a", "b"].iter().map(|s| s.to_string()).collect(),
            right_choice: "b".to_string(),
        };
        assert_eq!(q.key(), "q2");
        assert_eq!(q.kind(), QuestionKind::Radio);
        assert_eq!(q.choices().map(|c| c.len()), Some(2));

        let free = Question::Free {
            key: "q1".to_string(),
            answer: "Paris".to_string(),
        };
        assert!(free.choices().is_none());
    }

    #[test]
    fn test_question_serializes_with_kind_tag() {
        let q = Question::Free {
            key: "q1".to_string(),
            answer: "Paris".to_string(),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["kind"], "FREE");
        assert_eq!(json["key"], "q1");
        assert_eq!(json["answer"], "Paris");
    }
}
