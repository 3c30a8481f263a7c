//! Statistics report over the active task set.
//!
//! Reports are scoped by due time to one of two periods (today or the
//! current Monday-to-Sunday week) and carry three parts: summary counters,
//! a per-category distribution and a completion-rate trend sampled at fixed
//! nodes across the period.

use chrono::{Datelike, Duration, NaiveDateTime};
use clap::ValueEnum;

use crate::fields::{Category, Status};
use crate::task::Task;

/// Reporting period, resolved against `now`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
}

impl Period {
    /// Inclusive due-time bounds for the period containing `now`.
    pub fn bounds(self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let day_start = |d: chrono::NaiveDate| d.and_hms_opt(0, 0, 0).unwrap();
        let day_end = |d: chrono::NaiveDate| d.and_hms_opt(23, 59, 59).unwrap();
        match self {
            Period::Today => (day_start(now.date()), day_end(now.date())),
            Period::Week => {
                let weekday = now.date().weekday().number_from_monday() as i64;
                let monday = now.date() - Duration::days(weekday - 1);
                (day_start(monday), day_end(monday + Duration::days(6)))
            }
        }
    }
}

/// One sample of the completion-rate trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendNode {
    pub label: String,
    /// Cumulative completion rate (percent) over tasks due at or before
    /// this node's time, 0 when none are due yet.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub completion_rate: f64,
    /// Categories with at least one task in the period, in enum order.
    pub category_counts: Vec<(Category, usize)>,
    pub trend: Vec<TrendNode>,
}

/// Build the report for `period` from the active task set.
pub fn build_report(tasks: &[Task], period: Period, now: NaiveDateTime) -> StatsReport {
    let (start, end) = period.bounds(now);
    let in_range: Vec<&Task> =
        tasks.iter().filter(|t| t.due_time >= start && t.due_time <= end).collect();

    let total = in_range.len();
    let completed = in_range.iter().filter(|t| t.status == Status::Completed).count();
    let overdue = in_range.iter().filter(|t| t.is_overdue(now)).count();
    let completion_rate =
        if total > 0 { completed as f64 / total as f64 * 100.0 } else { 0.0 };

    let category_counts = Category::ALL
        .iter()
        .map(|&c| (c, in_range.iter().filter(|t| t.category == c).count()))
        .filter(|&(_, n)| n > 0)
        .collect();

    let nodes: Vec<(String, NaiveDateTime)> = match period {
        // One node every two hours, labelled by the hour.
        Period::Today => (0..24)
            .step_by(2)
            .map(|hour| (hour.to_string(), start + Duration::hours(hour)))
            .collect(),
        // One node per day, labelled month-day.
        Period::Week => (0..7)
            .map(|day| {
                let node = start + Duration::days(day);
                (node.format("%m-%d").to_string(), node)
            })
            .collect(),
    };

    let trend = nodes
        .into_iter()
        .map(|(label, node)| {
            let due_by_node: Vec<_> = in_range.iter().filter(|t| t.due_time <= node).collect();
            let done = due_by_node.iter().filter(|t| t.status == Status::Completed).count();
            let rate = if due_by_node.is_empty() {
                0.0
            } else {
                done as f64 / due_by_node.len() as f64 * 100.0
            };
            TrendNode { label, rate }
        })
        .collect();

    StatsReport {
        period_start: start,
        period_end: end,
        total,
        completed,
        overdue,
        completion_rate,
        category_counts,
        trend,
    }
}
