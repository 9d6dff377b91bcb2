//! Common utilities and constants for CLI commands

use anyhow::{Context, Result};
use quizbank_parser::ParseOptions;
use quizbank_store::QuestionStore;
use std::path::{Path, PathBuf};

/// Default database filename
pub const DEFAULT_DB_NAME: &str = ".quizbank.db";

/// Returns the database path, using the provided path or defaulting to
/// `DEFAULT_DB_NAME` in the given directory.
pub fn resolve_db_path(database: Option<PathBuf>, base_dir: &Path) -> PathBuf {
    database.unwrap_or_else(|| base_dir.join(DEFAULT_DB_NAME))
}

/// Resolves the database path against the current directory.
pub fn db_path_from_cwd(database: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(resolve_db_path(database, &cwd))
}

/// Opens an existing database, failing if it was never created.
pub fn open_existing(db_path: &Path) -> Result<QuestionStore> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {:?}. Run 'quizbank load' first.",
            db_path
        );
    }
    QuestionStore::open(db_path).with_context(|| format!("Failed to open database at {:?}", db_path))
}

pub fn parse_options(strict: bool) -> ParseOptions {
    ParseOptions {
        strict_answers: strict,
    }
}

/// Reads a question file into memory.
pub fn read_payload(file: &Path) -> Result<Vec<u8>> {
    std::fs::read(file).with_context(|| format!("Failed to read question file {:?}", file))
}
