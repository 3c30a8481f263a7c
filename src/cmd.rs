//! Command implementations for the CLI interface.
//!
//! Each subcommand has a `cmd_*` handler that talks to the store and prints
//! human-readable output. Handlers report failures on stderr and exit
//! non-zero; success paths print a short confirmation.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use chrono::{Local, NaiveDateTime};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::config::Config;
use crate::dates::{format_due_relative, parse_due_input};
use crate::error::Error;
use crate::export;
use crate::fields::{Category, Priority, Status, StatusFilter};
use crate::filter::{filter_tasks, FilterCriteria};
use crate::reminder::{self, ReminderEvent};
use crate::stats::{build_report, Period};
use crate::store::{TaskStore, DATETIME_FMT};
use crate::task::Task;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Task category.
        #[arg(long, value_enum, default_value_t = Category::Other)]
        category: Category,
        /// Priority level.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due time: "today", "tomorrow", "in 3h", "in 2d", "YYYY-MM-DD" or "YYYY-MM-DD HH:MM".
        #[arg(long)]
        due: String,
        /// Remind time, same formats as --due. Must not be later than the due time.
        #[arg(long)]
        remind: Option<String>,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Comma-separated tags. May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List active tasks with optional filters.
    List {
        /// Filter by category.
        #[arg(long, value_enum)]
        category: Option<Category>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by status. "overdue" means incomplete with the due time passed.
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
        /// Filter by tag (exact, case-insensitive).
        #[arg(long)]
        tag: Option<String>,
        /// Free-text search over title, description and tags.
        #[arg(long)]
        search: Option<String>,
    },

    /// View a single task by ID.
    View { id: i64 },

    /// Update fields on a task.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        remind: Option<String>,
        /// Clear the remind time.
        #[arg(long)]
        clear_remind: bool,
        #[arg(long)]
        desc: Option<String>,
        /// Progress percentage, 0-100.
        #[arg(long)]
        progress: Option<u8>,
    },

    /// Mark a task completed.
    Complete { id: i64 },

    /// Reopen a completed task.
    Reopen { id: i64 },

    /// Replace a task's tag set.
    Tag {
        id: i64,
        /// New tags, comma-separated. May be repeated. No tags clears the set.
        tags: Vec<String>,
    },

    /// List distinct tags across active tasks.
    Tags,

    /// Delete an active task (cascades to its tags).
    Delete { id: i64 },

    /// Archive all completed tasks.
    Archive,

    /// List archived tasks.
    Archived,

    /// Restore an archived task to the active set.
    Restore { id: i64 },

    /// Permanently delete an archived task. Irreversible.
    Purge { id: i64 },

    /// Show a statistics report for the current day or week.
    Stats {
        #[arg(long, value_enum, default_value_t = Period::Today)]
        period: Period,
    },

    /// Export active tasks to a file.
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
        /// Output file path (default: tasks.csv / tasks.html).
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Include archived tasks instead of active ones.
        #[arg(long)]
        archived: bool,
    },

    /// Watch for due-date reminders in the foreground.
    Watch,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
pub enum ExportFormat {
    Csv,
    Html,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn die(err: Error) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

fn parse_due_or_die(input: &str, what: &str) -> NaiveDateTime {
    match parse_due_input(input, now()) {
        Some(t) => t,
        None => {
            eprintln!(
                "Unrecognised {what} time. Use \"today\", \"tomorrow\", \"in 3h\", \"in 2d\", YYYY-MM-DD or \"YYYY-MM-DD HH:MM\"."
            );
            std::process::exit(1);
        }
    }
}

fn split_tags(inputs: &[String]) -> Vec<String> {
    inputs
        .iter()
        .flat_map(|raw| raw.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn print_table(tasks: &[&Task]) {
    println!(
        "{:<5} {:<8} {:<7} {:<11} {:>4} {:<14} {}",
        "ID", "Cat", "Pri", "Status", "%", "Due", "Title [tags]"
    );
    let now = now();
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        println!(
            "{:<5} {:<8} {:<7} {:<11} {:>4} {:<14} {}{}",
            t.id.unwrap_or(0),
            t.category.label(),
            t.priority.label(),
            t.status.label(),
            t.progress,
            format_due_relative(t.due_time, now),
            truncate(&t.title, 40),
            tags
        );
    }
}

/// Add a new task to the store.
pub fn cmd_add(
    store: &mut TaskStore,
    title: String,
    category: Category,
    priority: Priority,
    due: String,
    remind: Option<String>,
    desc: Option<String>,
    tags: Vec<String>,
) {
    let mut task = Task::new(title, category, priority, parse_due_or_die(&due, "due"));
    task.remind_time = remind.as_deref().map(|r| parse_due_or_die(r, "remind"));
    task.description = desc.filter(|d| !d.is_empty());

    let id = match store.add_task(&task) {
        Ok(id) => id,
        Err(e) => die(e),
    };
    let tags = split_tags(&tags);
    if !tags.is_empty() {
        if let Err(e) = store.set_tags(id, &tags) {
            die(e);
        }
    }
    println!("Added task {id}");
}

/// List active tasks, narrowed by the given criteria.
pub fn cmd_list(
    store: &TaskStore,
    category: Option<Category>,
    priority: Option<Priority>,
    status: Option<StatusFilter>,
    tag: Option<String>,
    search: Option<String>,
) {
    let tasks = match store.all_active() {
        Ok(t) => t,
        Err(e) => die(e),
    };
    let criteria = FilterCriteria { category, priority, status, tag, search };
    let visible = filter_tasks(&tasks, &criteria, now());
    print_table(&visible);
    println!("{} task(s)", visible.len());
}

/// View detailed information about a single task.
pub fn cmd_view(store: &TaskStore, id: i64) {
    let task = match store.task_by_id(id) {
        Ok(Some(t)) => t,
        Ok(None) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => die(e),
    };
    println!("ID:          {}", id);
    println!("Title:       {}", task.title);
    println!("Category:    {}", task.category.label());
    println!("Priority:    {}", task.priority.label());
    println!("Status:      {}", task.status.label());
    println!("Progress:    {}%", task.progress);
    println!(
        "Due:         {} ({})",
        task.due_time.format(DATETIME_FMT),
        format_due_relative(task.due_time, now())
    );
    println!(
        "Remind:      {}",
        task.remind_time.map(|r| r.format(DATETIME_FMT).to_string()).unwrap_or_else(|| "-".into())
    );
    println!("Archived:    {}", if task.archived { "yes" } else { "no" });
    println!(
        "Tags:        {}",
        if task.tags.is_empty() { "-".into() } else { task.tags.join(",") }
    );
    println!("Description:\n{}", task.description.unwrap_or_else(|| "-".into()));
}

/// Update an existing task's fields.
pub fn cmd_update(
    store: &TaskStore,
    id: i64,
    title: Option<String>,
    category: Option<Category>,
    priority: Option<Priority>,
    due: Option<String>,
    remind: Option<String>,
    clear_remind: bool,
    desc: Option<String>,
    progress: Option<u8>,
) {
    let mut task = match store.task_by_id(id) {
        Ok(Some(t)) => t,
        Ok(None) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => die(e),
    };
    if let Some(s) = title {
        task.title = s;
    }
    if let Some(c) = category {
        task.category = c;
    }
    if let Some(p) = priority {
        task.priority = p;
    }
    if let Some(d) = due {
        task.due_time = parse_due_or_die(&d, "due");
    }
    if clear_remind {
        task.remind_time = None;
    }
    if let Some(r) = remind {
        task.remind_time = Some(parse_due_or_die(&r, "remind"));
    }
    if let Some(d) = desc {
        task.description = if d.is_empty() { None } else { Some(d) };
    }
    if let Some(p) = progress {
        task.progress = p;
    }
    if let Err(e) = store.update_task(&task) {
        die(e);
    }
    println!("Updated task {id}");
}

fn set_status_or_die(store: &TaskStore, id: i64, status: Status, verb: &str) {
    match store.set_status(id, status) {
        Ok(true) => println!("{verb} task {id}"),
        Ok(false) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => die(e),
    }
}

pub fn cmd_complete(store: &TaskStore, id: i64) {
    set_status_or_die(store, id, Status::Completed, "Completed");
}

pub fn cmd_reopen(store: &TaskStore, id: i64) {
    set_status_or_die(store, id, Status::Incomplete, "Reopened");
}

/// Replace a task's tag set in full.
pub fn cmd_tag(store: &mut TaskStore, id: i64, tags: Vec<String>) {
    let tags = split_tags(&tags);
    match store.set_tags(id, &tags) {
        Ok(true) => println!("Tagged task {id}: {}", if tags.is_empty() { "-".into() } else { tags.join(",") }),
        Ok(false) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => die(e),
    }
}

/// List distinct tags across active tasks.
pub fn cmd_tags(store: &TaskStore) {
    let tags = match store.all_distinct_tags() {
        Ok(t) => t,
        Err(e) => die(e),
    };
    if tags.is_empty() {
        println!("No tags.");
        return;
    }
    for tag in tags {
        println!("{tag}");
    }
}

pub fn cmd_delete(store: &TaskStore, id: i64) {
    match store.delete_task(id) {
        Ok(true) => println!("Deleted task {id}"),
        Ok(false) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => die(e),
    }
}

/// Archive every completed active task.
pub fn cmd_archive(store: &TaskStore) {
    match store.archive_completed() {
        Ok(n) => println!("Archived {n} task(s)"),
        Err(e) => die(e),
    }
}

pub fn cmd_archived(store: &TaskStore) {
    let tasks = match store.all_archived() {
        Ok(t) => t,
        Err(e) => die(e),
    };
    let refs: Vec<&Task> = tasks.iter().collect();
    print_table(&refs);
    println!("{} archived task(s)", refs.len());
}

pub fn cmd_restore(store: &TaskStore, id: i64) {
    match store.restore(id) {
        Ok(true) => println!("Restored task {id}"),
        Ok(false) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => die(e),
    }
}

/// Permanently delete an archived task.
pub fn cmd_purge(store: &TaskStore, id: i64) {
    match store.delete_permanently(id) {
        Ok(true) => println!("Permanently deleted task {id}"),
        Ok(false) => {
            eprintln!("Task {id} is not in the archive.");
            std::process::exit(1);
        }
        Err(e) => die(e),
    }
}

/// Print a statistics report for the given period.
pub fn cmd_stats(store: &TaskStore, period: Period) {
    let tasks = match store.all_active() {
        Ok(t) => t,
        Err(e) => die(e),
    };
    let report = build_report(&tasks, period, now());
    println!(
        "Period: {} to {}",
        report.period_start.format("%Y-%m-%d"),
        report.period_end.format("%Y-%m-%d")
    );
    println!(
        "Total: {} | Completed: {} | Overdue: {} | Completion rate: {:.1}%",
        report.total, report.completed, report.overdue, report.completion_rate
    );
    if !report.category_counts.is_empty() {
        println!("By category:");
        for (category, count) in &report.category_counts {
            println!("  {:<8} {}", category.label(), count);
        }
    }
    println!("Completion rate trend:");
    for node in &report.trend {
        println!("  {:<6} {:>5.1}%", node.label, node.rate);
    }
}

/// Export tasks to CSV or an HTML report.
pub fn cmd_export(store: &TaskStore, format: ExportFormat, output: Option<PathBuf>, archived: bool) {
    let tasks = match if archived { store.all_archived() } else { store.all_active() } {
        Ok(t) => t,
        Err(e) => die(e),
    };
    let result = match format {
        ExportFormat::Csv => {
            let path = output.unwrap_or_else(|| PathBuf::from("tasks.csv"));
            export::write_csv(&tasks, &path).map(|()| path)
        }
        ExportFormat::Html => {
            let path = output.unwrap_or_else(|| PathBuf::from("tasks.html"));
            export::write_html(&tasks, now(), &path).map(|()| path)
        }
    };
    match result {
        Ok(path) => println!("Exported {} task(s) to {}", tasks.len(), path.display()),
        Err(e) => die(e),
    }
}

/// Run the reminder worker in the foreground, printing each batch.
pub fn cmd_watch(db_path: &Path, config: &Config) {
    if !config.reminders_enabled {
        println!("Reminders are disabled in the configuration.");
        return;
    }
    println!(
        "Watching for reminders every {}s (upcoming window: {}min). Ctrl-C to stop.",
        config.check_interval_secs, config.upcoming_threshold_mins
    );

    let (tx, rx) = mpsc::channel();
    let _handle = reminder::spawn(db_path.to_path_buf(), config, tx);

    for event in rx {
        let stamp = now().format("%H:%M:%S");
        match event {
            ReminderEvent::Overdue(tasks) => {
                for t in &tasks {
                    println!(
                        "[{stamp}] OVERDUE: #{} {} (due {})",
                        t.id.unwrap_or(0),
                        t.title,
                        t.due_time.format(DATETIME_FMT)
                    );
                }
            }
            ReminderEvent::Upcoming(tasks) => {
                for t in &tasks {
                    println!(
                        "[{stamp}] upcoming: #{} {} (due {})",
                        t.id.unwrap_or(0),
                        t.title,
                        t.due_time.format(DATETIME_FMT)
                    );
                }
            }
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
