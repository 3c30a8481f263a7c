use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Personal task manager CLI.
/// Storage defaults to ~/.taskdesk/tasks.db or a path passed via --db.
#[derive(Parser)]
#[command(name = "td", version, about = "Personal task management CLI")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
