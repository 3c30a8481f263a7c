//! Enumerations and field types for task records.
//!
//! This module defines the fixed vocabularies a task is classified with:
//! category, priority and completion status, plus the three-way status
//! filter the list views accept.

use clap::ValueEnum;

/// Fixed task category set.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Work,
    Study,
    Life,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Work, Category::Study, Category::Life, Category::Other];

    /// Stable storage token, also used by the schema CHECK constraint.
    pub fn as_sql(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Study => "study",
            Category::Life => "life",
            Category::Other => "other",
        }
    }

    pub fn from_sql(s: &str) -> Option<Category> {
        match s {
            "work" => Some(Category::Work),
            "study" => Some(Category::Study),
            "life" => Some(Category::Life),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Life => "Life",
            Category::Other => "Other",
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_sql(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn from_sql(s: &str) -> Option<Priority> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Task completion status. Stored as INTEGER 0/1.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Status {
    Incomplete,
    Completed,
}

impl Status {
    pub fn as_sql(self) -> i64 {
        match self {
            Status::Incomplete => 0,
            Status::Completed => 1,
        }
    }

    pub fn from_sql(v: i64) -> Status {
        if v == 1 { Status::Completed } else { Status::Incomplete }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Incomplete => "Incomplete",
            Status::Completed => "Completed",
        }
    }
}

/// Status filter accepted by list views. `Overdue` is a view-level refinement
/// of `Incomplete` (due time already passed), not a stored state.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    Incomplete,
    Completed,
    Overdue,
}
