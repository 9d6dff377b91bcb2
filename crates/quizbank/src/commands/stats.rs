//! Show question bank statistics

use anyhow::Result;
use quizbank_parser::QuestionKind;
use std::path::PathBuf;

use super::common::{db_path_from_cwd, open_existing};

pub async fn stats(database: Option<PathBuf>) -> Result<()> {
    let db_path = db_path_from_cwd(database)?;
    let store = open_existing(&db_path)?;
    let stats = store.get_stats()?;

    println!("Quiz Bank Statistics");
    println!("====================");
    println!("Database: {:?}", db_path);
    println!();
    println!("Questions: {}", stats.question_count());
    for kind in QuestionKind::ALL {
        println!("  {}: {}", kind, stats.count_of(kind));
    }
    println!();
    println!("Dependent records:");
    println!("  Quiz results: {}", stats.quiz_result_count);
    println!("  Wrong answers: {}", stats.wrong_answer_count);

    println!();
    match store.last_load()? {
        Some(last) => println!(
            "Last load: {} questions at {} (unix time)",
            last.question_count, last.loaded_at
        ),
        None => println!("Last load: (never)"),
    }

    Ok(())
}
