//! Replace the question bank with the contents of a file

use anyhow::{Context, Result};
use quizbank_store::{QuestionStore, RecordKind, load_payload};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use super::common::{db_path_from_cwd, parse_options, read_payload};

pub async fn load(file: &Path, database: Option<PathBuf>, strict: bool) -> Result<()> {
    let db_path = db_path_from_cwd(database)?;

    info!("Loading questions from {:?}", file);
    info!("Database: {:?}", db_path);

    let start = Instant::now();
    let payload = read_payload(file)?;
    let store = QuestionStore::open(&db_path)
        .with_context(|| format!("Failed to open database at {:?}", db_path))?;

    let report = load_payload(&store, &payload, parse_options(strict))
        .with_context(|| format!("Failed to load {:?}, question bank left unchanged", file))?;

    let elapsed = start.elapsed();

    info!("Load complete!");
    info!("  Questions: {}", report.inserted);
    for kind in RecordKind::PURGE_ORDER {
        info!("  Purged {}: {}", kind, report.purged_count(kind));
    }
    info!("  Time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}
