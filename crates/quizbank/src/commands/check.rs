//! Parse a question file without loading it

use anyhow::{Context, Result};
use quizbank_parser::{QuestionKind, parse_bytes_with};
use std::collections::BTreeMap;
use std::path::Path;

use super::common::{parse_options, read_payload};

pub async fn check(file: &Path, strict: bool) -> Result<()> {
    let payload = read_payload(file)?;
    let questions = parse_bytes_with(&payload, parse_options(strict))
        .with_context(|| format!("{:?} is not a valid question file", file))?;

    let mut by_kind: BTreeMap<QuestionKind, usize> = BTreeMap::new();
    for question in &questions {
        *by_kind.entry(question.kind()).or_default() += 1;
    }

    println!("{:?} is valid: {} questions", file, questions.len());
    for kind in QuestionKind::ALL {
        println!("  {}: {}", kind, by_kind.get(&kind).copied().unwrap_or(0));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_check_accepts_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("questions.csv");
        fs::write(&file, "FREE;q1;Paris\n  radio! ;q2;a,b;b\n").unwrap();

        check(&file, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_reports_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("questions.csv");
        fs::write(&file, "ESSAY;k;x\n").unwrap();

        let err = check(&file, false).await.unwrap_err();
        assert!(format!("{err:#}").contains("type 'ESSAY' is not known"));
    }
}
