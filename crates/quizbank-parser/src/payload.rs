//! Payload parsing: bytes → lines → fields → questions.

use crate::error::ParseError;
use crate::question::{Question, QuestionKind};
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::{debug, warn};

pub const LINE_SEPARATOR: char = '\n';
pub const FIELD_SEPARATOR: char = ';';
pub const VALUE_SEPARATOR: char = ',';

/// Knobs for [`parse_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject radio/check questions whose right answers are not among
    /// their choices.
    pub strict_answers: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { strict_answers: true }
    }
}

/// Decodes `bytes` as UTF-8 and parses the result with default options.
pub fn parse_bytes(bytes: &[u8]) -> Result<Vec<Question>, ParseError> {
    parse_bytes_with(bytes, ParseOptions::default())
}

pub fn parse_bytes_with(bytes: &[u8], options: ParseOptions) -> Result<Vec<Question>, ParseError> {
    let text = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = text {
        warn!("Payload is not valid UTF-8, malformed sequences were replaced");
    }
    parse_with(&text, options)
}

/// Parses a whole payload with default (permissive) options.
pub fn parse(text: &str) -> Result<Vec<Question>, ParseError> {
    parse_with(text, ParseOptions::default())
}

/// Parses a whole payload. The first bad line aborts the parse and nothing
/// parsed before it is returned.
pub fn parse_with(text: &str, options: ParseOptions) -> Result<Vec<Question>, ParseError> {
    let mut questions = Vec::new();

    for (index, raw) in text.split(LINE_SEPARATOR).enumerate() {
        let line = raw.trim_matches(is_invisible);
        if line.is_empty() {
            continue;
        }
        debug!("LINE {}: {}", index + 1, line);

        let question = parse_line(line, index + 1, options)?;
        questions.push(question);
    }

    debug!("Parsed {} questions", questions.len());
    Ok(questions)
}

/// Parses one non-empty, already trimmed line.
pub fn parse_line(line: &str, line_number: usize, options: ParseOptions) -> Result<Question, ParseError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let raw_tag = fields[0];

    let kind = QuestionKind::from_tag(&normalize_tag(raw_tag)).ok_or_else(|| ParseError::UnknownType {
        line_number,
        tag: raw_tag.to_string(),
    })?;

    if fields.len() != kind.field_count() {
        return Err(ParseError::Validation {
            line_number,
            line: line.to_string(),
            kind,
            expected: kind.field_count(),
            found: fields.len(),
        });
    }

    let key = fields[1].to_string();
    let question = match kind {
        QuestionKind::Free => Question::Free {
            key,
            answer: fields[2].to_string(),
        },
        QuestionKind::Radio => Question::Radio {
            key,
            choices: split_values(fields[2]),
            right_choice: fields[3].to_string(),
        },
        QuestionKind::Check => Question::Check {
            key,
            choices: split_values(fields[2]),
            right_choices: split_values(fields[3]),
        },
    };

    if options.strict_answers {
        check_answers_offered(&question, line_number)?;
    }

    Ok(question)
}

/// Strips every non-word character and uppercases what is left, so
/// `"  radio! "` becomes `"RADIO"`.
pub fn normalize_tag(tag: &str) -> String {
    tag.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Splits a `,`-separated list into a set. Empty values are kept.
fn split_values(field: &str) -> BTreeSet<String> {
    field.split(VALUE_SEPARATOR).map(str::to_string).collect()
}

fn check_answers_offered(question: &Question, line_number: usize) -> Result<(), ParseError> {
    let not_offered = |answer: &String| ParseError::AnswerNotOffered {
        line_number,
        key: question.key().to_string(),
        answer: answer.clone(),
    };

    match question {
        Question::Free { .. } => Ok(()),
        Question::Radio {
            choices,
            right_choice,
            ..
        } => {
            if choices.contains(right_choice) {
                Ok(())
            } else {
                Err(not_offered(right_choice))
            }
        }
        Question::Check {
            choices,
            right_choices,
            ..
        } => match right_choices.difference(choices).next() {
            Some(answer) => Err(not_offered(answer)),
            None => Ok(()),
        },
    }
}

/// Whitespace, control, format and other non-printing characters that are
/// trimmed from both ends of a line.
fn is_invisible(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c,
            '\u{00A0}'
            | '\u{00AD}'
            | '\u{0600}'..='\u{0604}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{1680}'
            | '\u{180E}'
            | '\u{2000}'..='\u{200F}'
            | '\u{2028}'..='\u{202F}'
            | '\u{205F}'..='\u{2064}'
            | '\u{206A}'..='\u{206F}'
            | '\u{3000}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_three_kinds() {
        let payload = "FREE;q1;Paris\nRADIO;q2;a,b,c;b\nCHECK;q3;x,y,z;x,z\n";
        let questions = parse(payload).unwrap();

        assert_eq!(
            questions,
            vec![
                Question::Free {
                    key: "q1".to_string(),
                    answer: "Paris".to_string(),
                },
                Question::Radio {
                    key: "q2".to_string(),
                    choices: set(&["a", "b", "c"]),
                    right_choice: "b".to_string(),
                },
                Question::Check {
                    key: "q3".to_string(),
                    choices: set(&["x", "y", "z"]),
                    right_choices: set(&["x", "z"]),
                },
            ]
        );
    }

    #[test]
    fn test_free_with_extra_field_fails_validation() {
        let err = parse("FREE;k;a;extra").unwrap_err();
        assert_eq!(
            err,
            ParseError::Validation {
                line_number: 1,
                line: "FREE;k;a;extra".to_string(),
                kind: QuestionKind::Free,
                expected: 3,
                found: 4,
            }
        );
    }

    #[test]
    fn test_radio_missing_field_fails_validation() {
        let err = parse("RADIO;k;a,b").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Validation {
                kind: QuestionKind::Radio,
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_check_field_count_enforced() {
        let err = parse("CHECK;k;a,b;a;b").unwrap_err();
        assert!(matches!(err, ParseError::Validation { found: 5, .. }));
    }

    #[test]
    fn test_tag_is_normalized() {
        let loose = parse("  radio! ;k;a,b;a").unwrap();
        let exact = parse("RADIO;k;a,b;a").unwrap();
        assert_eq!(loose, exact);
        assert_eq!(normalize_tag("  radio! "), "RADIO");
        assert_eq!(normalize_tag("\u{feff}Free"), "FREE");
    }

    #[test]
    fn test_unknown_tag_carries_raw_text() {
        let err = parse("ESSAY;k;x").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownType {
                line_number: 1,
                tag: "ESSAY".to_string(),
            }
        );

        let err = parse("FREE;q1;a\n essay?;k;x").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownType {
                line_number: 2,
                tag: "essay?".to_string(),
            }
        );
    }

    #[test]
    fn test_failure_discards_earlier_lines() {
        let result = parse("FREE;q1;a\nFREE;q2;b\nRADIO;q3");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().line_number(), 3);
    }

    #[test]
    fn test_blank_and_invisible_lines_are_skipped() {
        let payload = "\n   \n\u{feff}FREE;q1;Paris\r\n\t\n\u{200b}\nFREE;q2;Rome";
        let questions = parse(payload).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].key(), "q1");
        // Trailing CR is trimmed with the line.
        assert_eq!(
            questions[0],
            Question::Free {
                key: "q1".to_string(),
                answer: "Paris".to_string(),
            }
        );
    }

    #[test]
    fn test_inner_fields_are_not_trimmed() {
        let questions = parse("FREE; q1 ; a b ").unwrap();
        assert_eq!(
            questions[0],
            Question::Free {
                key: " q1 ".to_string(),
                answer: " a b".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_choices_collapse() {
        let questions = parse("CHECK;k;b,a,b,,a;a,a").unwrap();
        assert_eq!(
            questions[0],
            Question::Check {
                key: "k".to_string(),
                choices: set(&["", "a", "b"]),
                right_choices: set(&["a"]),
            }
        );
    }

    #[test]
    fn test_empty_payload_yields_no_questions() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n\n \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_bytes_decodes_utf8() {
        let questions = parse_bytes("FREE;q1;Zürich".as_bytes()).unwrap();
        assert_eq!(
            questions[0],
            Question::Free {
                key: "q1".to_string(),
                answer: "Zürich".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_bytes_replaces_malformed_utf8() {
        let questions = parse_bytes(b"FREE;q1;caf\xe9").unwrap();
        assert_eq!(
            questions[0],
            Question::Free {
                key: "q1".to_string(),
                answer: "caf\u{fffd}".to_string(),
            }
        );
    }

    #[test]
    fn test_permissive_mode_accepts_unoffered_answer() {
        let questions = parse("RADIO;k;a,b;z").unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn test_strict_mode_rejects_unoffered_radio_answer() {
        let err = parse_with("RADIO;k;a,b;z", ParseOptions::strict()).unwrap_err();
        assert_eq!(
            err,
            ParseError::AnswerNotOffered {
                line_number: 1,
                key: "k".to_string(),
                answer: "z".to_string(),
            }
        );
    }

    #[test]
    fn test_strict_mode_rejects_unoffered_check_answer() {
        let err = parse_with("CHECK;k;a,b;a,q", ParseOptions::strict()).unwrap_err();
        assert!(matches!(err, ParseError::AnswerNotOffered { ref answer, .. } if answer == "q"));

        let ok = parse_with("CHECK;k;a,b;a,b\nFREE;f;x", ParseOptions::strict()).unwrap();
        assert_eq!(ok.len(), 2);
    }
}
