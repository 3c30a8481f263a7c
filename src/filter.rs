//! In-memory filter engine for task list views.
//!
//! Filtering happens after the store read: the store hands back the active
//! (or archived) set and the criteria here narrow it in one linear pass.

use chrono::NaiveDateTime;

use crate::fields::{Category, Priority, Status, StatusFilter};
use crate::task::Task;

/// Composable filter criteria. A `None` field matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<StatusFilter>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.tag.is_none()
            && self.search.is_none()
    }

    fn matches(&self, task: &Task, now: NaiveDateTime) -> bool {
        if let Some(cat) = self.category {
            if task.category != cat {
                return false;
            }
        }
        if let Some(pri) = self.priority {
            if task.priority != pri {
                return false;
            }
        }
        if let Some(status) = self.status {
            let ok = match status {
                StatusFilter::Incomplete => task.status == Status::Incomplete,
                StatusFilter::Completed => task.status == Status::Completed,
                StatusFilter::Overdue => task.is_overdue(now),
            };
            if !ok {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            let wanted = tag.trim().to_lowercase();
            if !task.tags.iter().any(|t| t.to_lowercase() == wanted) {
                return false;
            }
        }
        if let Some(query) = &self.search {
            let needle = query.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_desc = task
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            let in_tags = task.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !(in_title || in_desc || in_tags) {
                return false;
            }
        }
        true
    }
}

/// Narrow `tasks` to those matching every set criterion, preserving input order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    criteria: &FilterCriteria,
    now: NaiveDateTime,
) -> Vec<&'a Task> {
    tasks.iter().filter(|t| criteria.matches(t, now)).collect()
}
