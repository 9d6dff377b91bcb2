//! List the stored questions

use anyhow::Result;
use quizbank_parser::Question;
use std::path::PathBuf;

use super::common::{db_path_from_cwd, open_existing};

pub async fn list(database: Option<PathBuf>, json: bool) -> Result<()> {
    let db_path = db_path_from_cwd(database)?;
    let store = open_existing(&db_path)?;
    let questions = store.list_questions()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&questions)?);
        return Ok(());
    }

    for question in &questions {
        println!("{}", describe(question));
    }
    println!();
    println!("{} questions", questions.len());

    Ok(())
}

fn join(values: &std::collections::BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

fn describe(question: &Question) -> String {
    match question {
        Question::Free { key, answer } => format!("[FREE]  {key}: {answer}"),
        Question::Radio {
            key,
            choices,
            right_choice,
        } => format!("[RADIO] {key}: {{{}}} -> {right_choice}", join(choices)),
        Question::Check {
            key,
            choices,
            right_choices,
        } => format!("[CHECK] {key}: {{{}}} -> {{{}}}", join(choices), join(right_choices)),
    }
}
