//! CSV and HTML report writers.
//!
//! Both formats render a task list snapshot. CSV is spreadsheet-oriented:
//! UTF-8 with a byte-order mark so older spreadsheet imports detect the
//! encoding, a fixed seven-column header, quoting only where needed. The
//! HTML report is a self-contained printable document with summary counters
//! and a styled table.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::info;

use crate::error::Result;
use crate::fields::{Priority, Status};
use crate::store::DATETIME_FMT;
use crate::task::Task;

const BOM: &str = "\u{FEFF}";
const CSV_HEADER: &str = "Seq,Title,Category,Priority,Due,Status,Description";

fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render tasks as a CSV document, sequence-numbered from 1.
pub fn tasks_to_csv(tasks: &[Task]) -> String {
    let mut out = String::from(BOM);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for (i, task) in tasks.iter().enumerate() {
        let fields = [
            (i + 1).to_string(),
            csv_field(&task.title),
            task.category.label().to_string(),
            task.priority.label().to_string(),
            task.due_time.format(DATETIME_FMT).to_string(),
            task.status.label().to_string(),
            csv_field(task.description.as_deref().unwrap_or("")),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

pub fn write_csv(tasks: &[Task], path: &Path) -> Result<()> {
    fs::write(path, tasks_to_csv(tasks))?;
    info!(path = %path.display(), count = tasks.len(), "exported csv");
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

/// Render tasks as a self-contained HTML report.
///
/// Summary counters are computed over the snapshot itself. Overdue
/// incomplete rows get a highlighted title cell.
pub fn tasks_to_html(tasks: &[Task], now: NaiveDateTime) -> String {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.status == Status::Completed).count();
    let overdue = tasks.iter().filter(|t| t.is_overdue(now)).count();
    let rate = if total > 0 { completed as f64 / total as f64 * 100.0 } else { 0.0 };

    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n\
         body { font-family: sans-serif; font-size: 10pt; margin: 20mm; line-height: 1.5; }\n\
         .title { text-align: center; font-size: 14pt; font-weight: bold; margin-bottom: 15px; }\n\
         .info { margin-bottom: 15px; }\n\
         table { width: 100%; border-collapse: collapse; }\n\
         th, td { border: 1px solid #000; padding: 6px 8px; text-align: left; }\n\
         th { background-color: #f0f0f0; }\n\
         .high { color: red; }\n\
         .medium { color: orange; }\n\
         .low { color: green; }\n\
         .overdue { color: red; font-weight: bold; }\n\
         </style>\n</head>\n<body>\n",
    );

    out.push_str("<div class='title'>Task Report</div>\n");
    let _ = writeln!(
        out,
        "<div class='info'>Exported: {}</div>",
        now.format(DATETIME_FMT)
    );
    let _ = writeln!(
        out,
        "<div class='info'>Total: {} | Completed: {} | Overdue: {} | Completion rate: {:.1}%</div>",
        total, completed, overdue, rate
    );

    out.push_str(
        "<table>\n<tr><th>Title</th><th>Category</th><th>Priority</th>\
         <th>Due</th><th>Status</th><th>Description</th></tr>\n",
    );
    for task in tasks {
        let title_class = if task.is_overdue(now) { "overdue" } else { "" };
        let _ = writeln!(
            out,
            "<tr><td class='{}'>{}</td><td>{}</td><td class='{}'>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td></tr>",
            title_class,
            html_escape(&task.title),
            task.category.label(),
            priority_class(task.priority),
            task.priority.label(),
            task.due_time.format("%Y-%m-%d %H:%M"),
            task.status.label(),
            html_escape(task.description.as_deref().unwrap_or("")),
        );
    }
    out.push_str("</table>\n</body>\n</html>\n");
    out
}

pub fn write_html(tasks: &[Task], now: NaiveDateTime, path: &Path) -> Result<()> {
    fs::write(path, tasks_to_html(tasks, now))?;
    info!(path = %path.display(), count = tasks.len(), "exported html report");
    Ok(())
}
