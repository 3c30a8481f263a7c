//! Task data structure and validation.
//!
//! This module defines the core `Task` struct that represents a single task
//! record with its classification, timing and lifecycle fields.

use chrono::NaiveDateTime;

use crate::error::Error;
use crate::fields::{Category, Priority, Status};

/// A single task record.
///
/// `id` is `None` until the store assigns one on insert. `tags` is a derived
/// view of the tags table: the store fills it on reads and ignores it on
/// task inserts/updates (tag writes go through `TaskStore::set_tags`).
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub due_time: NaiveDateTime,
    pub remind_time: Option<NaiveDateTime>,
    pub status: Status,
    pub description: Option<String>,
    pub progress: u8,
    pub archived: bool,
    pub tags: Vec<String>,
}

impl Task {
    /// Create an unsaved task with default lifecycle state
    /// (incomplete, not archived, zero progress).
    pub fn new(title: impl Into<String>, category: Category, priority: Priority, due_time: NaiveDateTime) -> Self {
        Task {
            id: None,
            title: title.into(),
            category,
            priority,
            due_time,
            remind_time: None,
            status: Status::Incomplete,
            description: None,
            progress: 0,
            archived: false,
            tags: Vec::new(),
        }
    }

    /// Check the field invariants a task must satisfy before any store write.
    ///
    /// Rejects an empty (after trimming) title, a remind time later than the
    /// due time, and progress above 100.
    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidTask("title must not be empty".into()));
        }
        if let Some(remind) = self.remind_time {
            if remind > self.due_time {
                return Err(Error::InvalidTask(
                    "remind time must not be later than due time".into(),
                ));
            }
        }
        if self.progress > 100 {
            return Err(Error::InvalidTask("progress must be between 0 and 100".into()));
        }
        Ok(())
    }

    /// Overdue means incomplete with a due time strictly in the past.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status == Status::Incomplete && self.due_time < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn sample() -> Task {
        Task::new("write report", Category::Work, Priority::High, dt("2025-06-01 18:00:00"))
    }

    #[test]
    fn valid_task_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        let mut t = sample();
        t.title = "   ".into();
        assert!(matches!(t.validate(), Err(Error::InvalidTask(_))));
    }

    #[test]
    fn remind_after_due_rejected() {
        let mut t = sample();
        t.remind_time = Some(dt("2025-06-01 19:00:00"));
        assert!(matches!(t.validate(), Err(Error::InvalidTask(_))));
    }

    #[test]
    fn remind_at_due_allowed() {
        let mut t = sample();
        t.remind_time = Some(t.due_time);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn progress_above_100_rejected() {
        let mut t = sample();
        t.progress = 101;
        assert!(matches!(t.validate(), Err(Error::InvalidTask(_))));
    }

    #[test]
    fn overdue_classification() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut t = sample();
        assert!(t.is_overdue(now));
        t.status = Status::Completed;
        assert!(!t.is_overdue(now));
    }
}
