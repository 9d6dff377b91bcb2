use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizbank")]
#[command(author, version, about = "Reload and inspect a quiz question bank")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the whole question bank with the questions in a file
    Load {
        /// Path to the question file
        file: PathBuf,

        /// Path to the database file (default: .quizbank.db in current directory)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Reject right answers that are not among the offered choices
        #[arg(long)]
        strict: bool,
    },

    /// Parse a question file without touching the database
    Check {
        /// Path to the question file
        file: PathBuf,

        /// Reject right answers that are not among the offered choices
        #[arg(long)]
        strict: bool,
    },

    /// Show question bank statistics
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List the stored questions
    List {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Load {
            file,
            database,
            strict,
        } => commands::load(&file, database, strict).await,
        Commands::Check { file, strict } => commands::check(&file, strict).await,
        Commands::Stats { database } => commands::stats(database).await,
        Commands::List { database, json } => commands::list(database, json).await,
    }
}
