//! Due-time parsing and relative formatting helpers.
//!
//! Accepts human-friendly input for due and remind times and renders
//! due times relative to now for table output.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Parse human-readable due-time input.
///
/// Supports:
/// - "today", "tomorrow" (end of day)
/// - "in 3h", "in 2d"
/// - "YYYY-MM-DD HH:MM" and "YYYY-MM-DD HH:MM:SS"
/// - "YYYY-MM-DD" (end of day)
pub fn parse_due_input(s: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let s = s.trim().to_lowercase();
    // Date-only inputs resolve to end of that day.
    let end_of = |d: NaiveDate| d.and_hms_opt(23, 59, 0);

    match s.as_str() {
        "today" => return end_of(now.date()),
        "tomorrow" => return end_of(now.date() + Duration::days(1)),
        _ => {}
    }

    // "in N{h,d}" patterns
    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nh) = rest.strip_suffix('h') {
            if let Ok(hours) = nh.trim().parse::<i64>() {
                return Some(now + Duration::hours(hours));
            }
        }
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(now + Duration::days(days));
            }
        }
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok().and_then(end_of)
}

/// Format a due time relative to now ("today 18:00", "tomorrow 09:30",
/// "in 3d", "2d late").
pub fn format_due_relative(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let days = (due.date() - now.date()).num_days();
    if days == 0 {
        format!("today {}", due.format("%H:%M"))
    } else if days == 1 {
        format!("tomorrow {}", due.format("%H:%M"))
    } else if days > 1 {
        format!("in {}d", days)
    } else if days == -1 {
        "1d late".into()
    } else {
        format!("{}d late", -days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-06-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parses_today_and_tomorrow() {
        let t = parse_due_input("today", now()).unwrap();
        assert_eq!(t.date(), now().date());
        assert_eq!(t.format("%H:%M").to_string(), "23:59");

        let t = parse_due_input("Tomorrow", now()).unwrap();
        assert_eq!(t.date(), now().date() + Duration::days(1));
    }

    #[test]
    fn parses_relative_offsets() {
        assert_eq!(parse_due_input("in 3h", now()).unwrap(), now() + Duration::hours(3));
        assert_eq!(parse_due_input("in 2d", now()).unwrap(), now() + Duration::days(2));
    }

    #[test]
    fn parses_explicit_formats() {
        let t = parse_due_input("2025-07-04 08:30", now()).unwrap();
        assert_eq!(t.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-07-04 08:30:00");
        let t = parse_due_input("2025-07-04", now()).unwrap();
        assert_eq!(t.format("%H:%M").to_string(), "23:59");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_due_input("whenever", now()).is_none());
        assert!(parse_due_input("in 3y", now()).is_none());
    }

    #[test]
    fn relative_rendering() {
        assert_eq!(format_due_relative(now() + Duration::hours(2), now()), "today 12:00");
        assert_eq!(format_due_relative(now() + Duration::days(5), now()), "in 5d");
        assert_eq!(format_due_relative(now() - Duration::days(2), now()), "2d late");
    }
}
