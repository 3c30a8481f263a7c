//! Durable task storage over SQLite.
//!
//! `TaskStore` owns the persisted task and tag data and exposes the CRUD,
//! archival, tag and statistics surface everything else reads through. Each
//! store instance wraps one connection; threads that need concurrent access
//! open their own instance against the same database file.
//!
//! Schema: two tables. `tasks` holds one row per task; `tags` holds
//! `(task_id, tag_name)` pairs with cascade delete. Opening a database
//! created by an older build adds the `progress`, `remind_time` and
//! `is_archived` columns in place without touching existing rows.

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fields::{Category, Priority, Status};
use crate::task::Task;

/// Storage layout for timestamps. Collates lexicographically, so SQL
/// comparisons against a formatted "now" are chronologically correct.
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_COLS: &str =
    "id, title, category, priority, due_time, remind_time, status, description, progress, is_archived";

/// Durable store for tasks and their tags.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open (creating if needed) the database at `path` and bring its schema
    /// up to date. An error here means the store is unusable and the caller
    /// must not proceed.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn, &path.display().to_string())
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, ":memory:")
    }

    fn init(conn: Connection, label: &str) -> Result<Self> {
        // Cascade delete on tags only works with the pragma enabled.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                category TEXT NOT NULL CHECK(category IN ('work', 'study', 'life', 'other')),
                priority TEXT NOT NULL CHECK(priority IN ('high', 'medium', 'low')),
                due_time TEXT NOT NULL,
                remind_time TEXT,
                status INTEGER NOT NULL DEFAULT 0 CHECK(status IN (0, 1)),
                description TEXT,
                progress INTEGER DEFAULT 0,
                is_archived INTEGER DEFAULT 0
            )",
            [],
        )?;
        // Additive migration for databases created before these columns existed.
        Self::ensure_column(&conn, "progress", "progress INTEGER DEFAULT 0")?;
        Self::ensure_column(&conn, "remind_time", "remind_time TEXT")?;
        Self::ensure_column(&conn, "is_archived", "is_archived INTEGER DEFAULT 0")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL,
                tag_name TEXT NOT NULL,
                FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE
            )",
            [],
        )?;
        debug!(db = label, "task store ready");
        Ok(TaskStore { conn })
    }

    fn ensure_column(conn: &Connection, name: &str, ddl: &str) -> Result<()> {
        let mut stmt = conn.prepare("PRAGMA table_info(tasks)")?;
        let exists = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(std::result::Result::ok)
            .any(|col| col == name);
        if !exists {
            conn.execute(&format!("ALTER TABLE tasks ADD COLUMN {ddl}"), [])?;
            debug!(column = name, "added missing column to tasks table");
        }
        Ok(())
    }

    // ----- task CRUD -----

    /// Insert a new task, returning its assigned id. The task is validated
    /// first; no row is written when validation fails.
    pub fn add_task(&self, task: &Task) -> Result<i64> {
        task.validate()?;
        self.conn.execute(
            "INSERT INTO tasks (title, category, priority, due_time, remind_time, status, description, progress, is_archived)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.title,
                task.category.as_sql(),
                task.priority.as_sql(),
                fmt_dt(task.due_time),
                task.remind_time.map(fmt_dt),
                task.status.as_sql(),
                task.description,
                task.progress,
                task.archived as i64,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, title = %task.title, "task added");
        Ok(id)
    }

    /// Rewrite every stored field of an existing task (tags excepted).
    pub fn update_task(&self, task: &Task) -> Result<()> {
        task.validate()?;
        let id = task
            .id
            .ok_or_else(|| Error::InvalidTask("cannot update an unsaved task".into()))?;
        let affected = self.conn.execute(
            "UPDATE tasks
             SET title = ?1, category = ?2, priority = ?3, due_time = ?4,
                 remind_time = ?5, status = ?6, description = ?7,
                 progress = ?8, is_archived = ?9
             WHERE id = ?10",
            params![
                task.title,
                task.category.as_sql(),
                task.priority.as_sql(),
                fmt_dt(task.due_time),
                task.remind_time.map(fmt_dt),
                task.status.as_sql(),
                task.description,
                task.progress,
                task.archived as i64,
                id,
            ],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    /// Status-only update. Returns false when the id is unknown.
    pub fn set_status(&self, id: i64, status: Status) -> Result<bool> {
        let affected = self
            .conn
            .execute("UPDATE tasks SET status = ?1 WHERE id = ?2", params![status.as_sql(), id])?;
        Ok(affected > 0)
    }

    /// Progress-only update (0-100). Returns false when the id is unknown.
    pub fn set_progress(&self, id: i64, progress: u8) -> Result<bool> {
        if progress > 100 {
            return Err(Error::InvalidTask("progress must be between 0 and 100".into()));
        }
        let affected = self
            .conn
            .execute("UPDATE tasks SET progress = ?1 WHERE id = ?2", params![progress, id])?;
        Ok(affected > 0)
    }

    /// Delete a task and, via cascade, its tags. Returns false for unknown
    /// or non-positive ids.
    pub fn delete_task(&self, id: i64) -> Result<bool> {
        if id <= 0 {
            return Ok(false);
        }
        let affected = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Fetch a single task with its tags.
    pub fn task_by_id(&self, id: i64) -> Result<Option<Task>> {
        if id <= 0 {
            return Ok(None);
        }
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"))?;
        let mut tasks: Vec<Task> = stmt
            .query_map(params![id], task_from_row)?
            .collect::<rusqlite::Result<_>>()?;
        if let Some(task) = tasks.first_mut() {
            task.tags = self.tags_for(id)?;
        }
        Ok(tasks.pop())
    }

    // ----- listing -----

    /// Non-archived tasks, newest id first.
    pub fn all_active(&self) -> Result<Vec<Task>> {
        self.select_tasks("WHERE is_archived = 0 ORDER BY id DESC", params![])
    }

    /// Archived tasks, newest id first.
    pub fn all_archived(&self) -> Result<Vec<Task>> {
        self.select_tasks("WHERE is_archived = 1 ORDER BY id DESC", params![])
    }

    /// Incomplete, non-archived tasks whose due time is strictly before `now`.
    pub fn overdue_incomplete(&self, now: NaiveDateTime) -> Result<Vec<Task>> {
        self.select_tasks(
            "WHERE status = 0 AND due_time < ?1 AND is_archived = 0 ORDER BY id DESC",
            params![fmt_dt(now)],
        )
    }

    fn select_tasks(&self, tail: &str, params: impl rusqlite::Params) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLS} FROM tasks {tail}"))?;
        let mut tasks: Vec<Task> = stmt
            .query_map(params, task_from_row)?
            .collect::<rusqlite::Result<_>>()?;
        for task in &mut tasks {
            if let Some(id) = task.id {
                task.tags = self.tags_for(id)?;
            }
        }
        Ok(tasks)
    }

    // ----- archival lifecycle -----

    /// Archive every completed, non-archived task. Returns how many rows
    /// changed. Incomplete tasks are never touched.
    pub fn archive_completed(&self) -> Result<usize> {
        let affected = self
            .conn
            .execute("UPDATE tasks SET is_archived = 1 WHERE status = 1 AND is_archived = 0", [])?;
        debug!(count = affected, "archived completed tasks");
        Ok(affected)
    }

    /// Move an archived task back to the active set. Idempotent: restoring an
    /// already-active task succeeds and changes nothing.
    pub fn restore(&self, id: i64) -> Result<bool> {
        if id <= 0 {
            return Ok(false);
        }
        let affected = self
            .conn
            .execute("UPDATE tasks SET is_archived = 0 WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Irreversibly delete an archived task and its tags. Active tasks are
    /// refused; they must be archived first.
    pub fn delete_permanently(&self, id: i64) -> Result<bool> {
        if id <= 0 {
            return Ok(false);
        }
        let affected = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1 AND is_archived = 1", params![id])?;
        Ok(affected > 0)
    }

    // ----- tags -----

    /// Replace the full tag set of a task. Names are trimmed; blank and
    /// duplicate entries are dropped, case is preserved. Both steps run in
    /// one transaction, so a failure cannot strand the task tagless.
    /// Returns false when the task does not exist.
    pub fn set_tags(&mut self, id: i64, names: &[String]) -> Result<bool> {
        if id <= 0 || !self.task_exists(id)? {
            return Ok(false);
        }
        let mut cleaned: Vec<&str> = Vec::new();
        for name in names {
            let trimmed = name.trim();
            if !trimmed.is_empty() && !cleaned.contains(&trimmed) {
                cleaned.push(trimmed);
            }
        }
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tags WHERE task_id = ?1", params![id])?;
        for name in &cleaned {
            tx.execute("INSERT INTO tags (task_id, tag_name) VALUES (?1, ?2)", params![id, name])?;
        }
        tx.commit()?;
        Ok(true)
    }

    /// Tag names attached to a task. Empty for unknown ids.
    pub fn tags_for(&self, id: i64) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag_name FROM tags WHERE task_id = ?1")?;
        let tags = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        Ok(tags)
    }

    /// Every distinct tag name in use, sorted lexicographically.
    pub fn all_distinct_tags(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT tag_name FROM tags ORDER BY tag_name")?;
        let tags = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        Ok(tags)
    }

    /// Active tasks carrying the given tag, newest id first.
    pub fn tasks_by_tag(&self, name: &str) -> Result<Vec<Task>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks t
             JOIN tags g ON t.id = g.task_id
             WHERE g.tag_name = ?1 AND t.is_archived = 0
             ORDER BY t.id DESC",
            SELECT_COLS
                .split(", ")
                .map(|c| format!("t.{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))?;
        let mut tasks: Vec<Task> = stmt
            .query_map(params![name], task_from_row)?
            .collect::<rusqlite::Result<_>>()?;
        for task in &mut tasks {
            if let Some(id) = task.id {
                task.tags = self.tags_for(id)?;
            }
        }
        Ok(tasks)
    }

    fn task_exists(&self, id: i64) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks WHERE id = ?1", params![id], |row| row.get(0))?;
        Ok(count > 0)
    }

    // ----- statistics (active scope) -----

    pub fn total_count(&self) -> Result<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks WHERE is_archived = 0", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn completed_count(&self) -> Result<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = 1 AND is_archived = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    pub fn overdue_count(&self, now: NaiveDateTime) -> Result<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE status = 0 AND due_time < ?1 AND is_archived = 0",
            params![fmt_dt(now)],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    /// Percentage of active tasks that are completed; 0.0 for an empty set.
    pub fn completion_rate(&self) -> Result<f64> {
        let total = self.total_count()?;
        if total == 0 {
            return Ok(0.0);
        }
        Ok(self.completed_count()? as f64 / total as f64 * 100.0)
    }
}

pub fn fmt_dt(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_dt_column(idx: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FMT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, format!("bad timestamp {raw:?}: {e}").into())
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let category_raw: String = row.get(2)?;
    let category = Category::from_sql(&category_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, format!("unknown category {category_raw:?}").into())
    })?;
    let priority_raw: String = row.get(3)?;
    let priority = Priority::from_sql(&priority_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, format!("unknown priority {priority_raw:?}").into())
    })?;
    let due_raw: String = row.get(4)?;
    let remind_raw: Option<String> = row.get(5)?;
    let remind_time = match &remind_raw {
        Some(raw) => Some(parse_dt_column(5, raw)?),
        None => None,
    };
    Ok(Task {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        category,
        priority,
        due_time: parse_dt_column(4, &due_raw)?,
        remind_time,
        status: Status::from_sql(row.get(6)?),
        description: row.get(7)?,
        progress: row.get::<_, Option<u8>>(8)?.unwrap_or(0),
        archived: row.get::<_, Option<i64>>(9)?.unwrap_or(0) != 0,
        tags: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap()
    }

    fn now() -> NaiveDateTime {
        dt("2025-06-01 12:00:00")
    }

    fn task(title: &str) -> Task {
        Task::new(title, Category::Work, Priority::Medium, dt("2025-06-02 18:00:00"))
    }

    fn store() -> TaskStore {
        TaskStore::open_in_memory().unwrap()
    }

    #[test]
    fn add_and_fetch_round_trip() {
        let store = store();
        let mut t = task("write report");
        t.description = Some("quarterly numbers".into());
        t.remind_time = Some(dt("2025-06-02 17:00:00"));
        t.progress = 40;
        let id = store.add_task(&t).unwrap();
        assert!(id > 0);

        let got = store.task_by_id(id).unwrap().unwrap();
        assert_eq!(got.title, "write report");
        assert_eq!(got.category, Category::Work);
        assert_eq!(got.priority, Priority::Medium);
        assert_eq!(got.due_time, t.due_time);
        assert_eq!(got.remind_time, t.remind_time);
        assert_eq!(got.status, Status::Incomplete);
        assert_eq!(got.description.as_deref(), Some("quarterly numbers"));
        assert_eq!(got.progress, 40);
        assert!(!got.archived);
        assert!(got.tags.is_empty());
    }

    #[test]
    fn add_rejects_invalid_task() {
        let store = store();
        let mut t = task(" ");
        assert!(matches!(store.add_task(&t), Err(Error::InvalidTask(_))));
        t.title = "ok".into();
        t.remind_time = Some(dt("2025-06-03 00:00:00"));
        assert!(matches!(store.add_task(&t), Err(Error::InvalidTask(_))));
        assert_eq!(store.total_count().unwrap(), 0);
    }

    #[test]
    fn active_listing_is_newest_first() {
        let store = store();
        let a = store.add_task(&task("first")).unwrap();
        let b = store.add_task(&task("second")).unwrap();
        let c = store.add_task(&task("third")).unwrap();
        let ids: Vec<i64> = store.all_active().unwrap().iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[test]
    fn update_round_trip_and_not_found() {
        let store = store();
        let id = store.add_task(&task("draft")).unwrap();
        let mut t = store.task_by_id(id).unwrap().unwrap();
        t.title = "final".into();
        t.priority = Priority::High;
        t.progress = 90;
        store.update_task(&t).unwrap();
        let got = store.task_by_id(id).unwrap().unwrap();
        assert_eq!(got.title, "final");
        assert_eq!(got.priority, Priority::High);
        assert_eq!(got.progress, 90);

        t.id = Some(9999);
        assert!(matches!(store.update_task(&t), Err(Error::NotFound(9999))));
        t.id = None;
        assert!(matches!(store.update_task(&t), Err(Error::InvalidTask(_))));
    }

    #[test]
    fn delete_task_semantics() {
        let store = store();
        let id = store.add_task(&task("gone soon")).unwrap();
        assert!(!store.delete_task(0).unwrap());
        assert!(!store.delete_task(-4).unwrap());
        assert!(!store.delete_task(id + 100).unwrap());
        assert!(store.delete_task(id).unwrap());
        assert!(store.task_by_id(id).unwrap().is_none());
    }

    #[test]
    fn delete_cascades_tags() {
        let mut store = store();
        let id = store.add_task(&task("tagged")).unwrap();
        store.set_tags(id, &["urgent".into(), "home".into()]).unwrap();
        assert_eq!(store.tags_for(id).unwrap().len(), 2);

        assert!(store.delete_task(id).unwrap());
        assert!(store.tags_for(id).unwrap().is_empty());
        assert!(store.all_distinct_tags().unwrap().is_empty());
    }

    #[test]
    fn set_tags_replace_all_and_cleanup() {
        let mut store = store();
        let id = store.add_task(&task("tagged")).unwrap();
        assert!(store.set_tags(id, &["a".into(), "b".into()]).unwrap());
        let mut got = store.tags_for(id).unwrap();
        got.sort();
        assert_eq!(got, vec!["a", "b"]);

        // Replace-all: previous set is fully discarded.
        assert!(store.set_tags(id, &[" B ".into(), "".into(), "c".into(), "c".into()]).unwrap());
        let mut got = store.tags_for(id).unwrap();
        got.sort();
        assert_eq!(got, vec!["B", "c"]);

        // Unknown task: no-op, reported as false.
        assert!(!store.set_tags(777, &["x".into()]).unwrap());
        // Empty replacement clears the set.
        assert!(store.set_tags(id, &[]).unwrap());
        assert!(store.tags_for(id).unwrap().is_empty());
    }

    #[test]
    fn distinct_tags_sorted() {
        let mut store = store();
        let a = store.add_task(&task("a")).unwrap();
        let b = store.add_task(&task("b")).unwrap();
        store.set_tags(a, &["zeta".into(), "alpha".into()]).unwrap();
        store.set_tags(b, &["mid".into(), "alpha".into()]).unwrap();
        assert_eq!(store.all_distinct_tags().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn tasks_by_tag_active_only() {
        let mut store = store();
        let a = store.add_task(&task("active one")).unwrap();
        let b = store.add_task(&task("to archive")).unwrap();
        store.set_tags(a, &["shared".into()]).unwrap();
        store.set_tags(b, &["shared".into()]).unwrap();
        store.set_status(b, Status::Completed).unwrap();
        store.archive_completed().unwrap();

        let found = store.tasks_by_tag("shared").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, Some(a));
        assert_eq!(found[0].tags, vec!["shared"]);
        assert!(store.tasks_by_tag("  ").unwrap().is_empty());
    }

    #[test]
    fn overdue_incomplete_membership() {
        let store = store();
        let mut late = task("late");
        late.due_time = dt("2025-06-01 11:59:00");
        let late_id = store.add_task(&late).unwrap();
        store.add_task(&task("future")).unwrap();

        let overdue = store.overdue_incomplete(now()).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, Some(late_id));

        // Completing removes it from the overdue population.
        store.set_status(late_id, Status::Completed).unwrap();
        assert!(store.overdue_incomplete(now()).unwrap().is_empty());
    }

    #[test]
    fn archive_only_completed() {
        let store = store();
        let open_id = store.add_task(&task("still open")).unwrap();
        let done_id = store.add_task(&task("done")).unwrap();
        store.set_status(done_id, Status::Completed).unwrap();

        assert_eq!(store.archive_completed().unwrap(), 1);
        // Second run has nothing left to archive.
        assert_eq!(store.archive_completed().unwrap(), 0);

        let active: Vec<i64> = store.all_active().unwrap().iter().filter_map(|t| t.id).collect();
        assert_eq!(active, vec![open_id]);
        let archived: Vec<i64> = store.all_archived().unwrap().iter().filter_map(|t| t.id).collect();
        assert_eq!(archived, vec![done_id]);
    }

    #[test]
    fn archived_excluded_from_views_and_stats() {
        let store = store();
        let mut t = task("will archive");
        t.due_time = dt("2025-05-01 00:00:00");
        let id = store.add_task(&t).unwrap();
        store.set_status(id, Status::Completed).unwrap();
        store.archive_completed().unwrap();

        assert!(store.all_active().unwrap().is_empty());
        assert!(store.overdue_incomplete(now()).unwrap().is_empty());
        assert_eq!(store.total_count().unwrap(), 0);
        assert_eq!(store.completed_count().unwrap(), 0);
        assert_eq!(store.overdue_count(now()).unwrap(), 0);
    }

    #[test]
    fn restore_is_idempotent() {
        let store = store();
        let id = store.add_task(&task("round trip")).unwrap();
        store.set_status(id, Status::Completed).unwrap();
        store.archive_completed().unwrap();

        assert!(store.restore(id).unwrap());
        assert!(store.restore(id).unwrap());
        let got = store.task_by_id(id).unwrap().unwrap();
        assert!(!got.archived);
        // Restore changes only the archived flag.
        assert_eq!(got.status, Status::Completed);
    }

    #[test]
    fn permanent_delete_only_from_archive() {
        let store = store();
        let id = store.add_task(&task("precious")).unwrap();
        // Active tasks are protected from permanent deletion.
        assert!(!store.delete_permanently(id).unwrap());
        assert!(store.task_by_id(id).unwrap().is_some());

        store.set_status(id, Status::Completed).unwrap();
        store.archive_completed().unwrap();
        assert!(store.delete_permanently(id).unwrap());
        assert!(store.task_by_id(id).unwrap().is_none());
    }

    #[test]
    fn completion_rate_boundaries() {
        let store = store();
        assert_eq!(store.completion_rate().unwrap(), 0.0);

        let a = store.add_task(&task("one")).unwrap();
        store.add_task(&task("two")).unwrap();
        store.set_status(a, Status::Completed).unwrap();
        assert!((store.completion_rate().unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn opens_legacy_schema_without_data_loss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    category TEXT NOT NULL,
                    priority TEXT NOT NULL,
                    due_time TEXT NOT NULL,
                    status INTEGER NOT NULL DEFAULT 0,
                    description TEXT
                )",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO tasks (title, category, priority, due_time, status, description)
                 VALUES ('legacy row', 'life', 'low', '2025-01-01 09:00:00', 0, NULL)",
                [],
            )
            .unwrap();
        }

        let store = TaskStore::open(&path).unwrap();
        let tasks = store.all_active().unwrap();
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.title, "legacy row");
        assert_eq!(t.category, Category::Life);
        assert_eq!(t.progress, 0);
        assert_eq!(t.remind_time, None);
        assert!(!t.archived);

        // Migrated columns are writable.
        let id = t.id.unwrap();
        assert!(store.set_progress(id, 25).unwrap());
        store.set_status(id, Status::Completed).unwrap();
        assert_eq!(store.archive_completed().unwrap(), 1);
        assert_eq!(store.all_archived().unwrap().len(), 1);
    }

    #[test]
    fn scenario_full_lifecycle() {
        let mut store = store();
        let due = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut t = Task::new("ship release", Category::Work, Priority::High, due);
        t.description = Some("cut v2".into());
        let id = store.add_task(&t).unwrap();
        store.set_tags(id, &["release".into()]).unwrap();

        store.set_status(id, Status::Completed).unwrap();
        assert_eq!(store.archive_completed().unwrap(), 1);
        assert!(store.restore(id).unwrap());
        assert_eq!(store.all_active().unwrap().len(), 1);

        store.set_status(id, Status::Completed).unwrap();
        store.archive_completed().unwrap();
        assert!(store.delete_permanently(id).unwrap());
        assert!(store.tags_for(id).unwrap().is_empty());
    }
}
