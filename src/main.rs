//! # td - personal task management CLI
//!
//! A desktop task manager: create, filter and tag tasks, archive completed
//! items, export CSV/HTML reports and watch for due-date reminders.
//!
//! ## Quick start
//!
//! ```bash
//! # Add a task due tomorrow evening
//! td add "Write the quarterly report" --category work --priority high --due tomorrow
//!
//! # List open work tasks
//! td list --category work --status incomplete
//!
//! # Mark it done, then archive all completed tasks
//! td complete 1
//! td archive
//!
//! # Follow due-date reminders in a terminal
//! td watch
//! ```
//!
//! Data is stored locally in `~/.taskdesk/`: an SQLite database (`tasks.db`)
//! and a TOML settings file (`config.toml`).

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod fields;
pub mod filter;
pub mod reminder;
pub mod stats;
pub mod store;
pub mod task;

use cli::Cli;
use cmd::*;
use config::Config;
use store::TaskStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Completions need no storage at all.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let data_dir = {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".taskdesk");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir
    };
    let db_path = cli.db.unwrap_or_else(|| data_dir.join("tasks.db"));
    let config = match Config::load_or_default(&data_dir.join("config.toml")) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut store = match TaskStore::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Add { title, category, priority, due, remind, desc, tags } => {
            cmd_add(&mut store, title, category, priority, due, remind, desc, tags)
        }

        Commands::List { category, priority, status, tag, search } => {
            cmd_list(&store, category, priority, status, tag, search)
        }

        Commands::View { id } => cmd_view(&store, id),

        Commands::Update {
            id, title, category, priority, due, remind, clear_remind, desc, progress,
        } => cmd_update(
            &store, id, title, category, priority, due, remind, clear_remind, desc, progress,
        ),

        Commands::Complete { id } => cmd_complete(&store, id),

        Commands::Reopen { id } => cmd_reopen(&store, id),

        Commands::Tag { id, tags } => cmd_tag(&mut store, id, tags),

        Commands::Tags => cmd_tags(&store),

        Commands::Delete { id } => cmd_delete(&store, id),

        Commands::Archive => cmd_archive(&store),

        Commands::Archived => cmd_archived(&store),

        Commands::Restore { id } => cmd_restore(&store, id),

        Commands::Purge { id } => cmd_purge(&store, id),

        Commands::Stats { period } => cmd_stats(&store, period),

        Commands::Export { format, output, archived } => {
            cmd_export(&store, format, output, archived)
        }

        Commands::Watch => cmd_watch(&db_path, &config),

        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
