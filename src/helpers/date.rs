//! Date helper functions

use chrono::{Datelike, Local, NaiveDate};

use crate::content::parse_date_string;

/// Format a publication date as "April 8, 2024".
///
/// With `include_relative`, appends the distance from today, e.g.
/// "April 8, 2024 (2mo ago)". Unparseable input is returned as-is.
pub fn format_date(published_at: &str, include_relative: bool) -> String {
    format_date_from(published_at, include_relative, Local::now().date_naive())
}

/// Same as [`format_date`] with an explicit "today"
pub fn format_date_from(published_at: &str, include_relative: bool, today: NaiveDate) -> String {
    let Some(target) = parse_date_string(published_at) else {
        return published_at.to_string();
    };
    let target = target.date();

    let full = target.format("%B %-d, %Y").to_string();
    if !include_relative {
        return full;
    }

    format!("{} ({})", full, relative_date(target, today))
}

/// Coarse distance between two dates: "3y ago", "2mo ago", "5d ago" or "Today".
///
/// Compares calendar fields one at a time, largest first, so
/// Dec 31 -> Jan 1 reads as "1y ago". Future dates read as "Today".
pub fn relative_date(target: NaiveDate, today: NaiveDate) -> String {
    if target >= today {
        return "Today".to_string();
    }

    let years = today.year() - target.year();
    let months = today.month() as i32 - target.month() as i32;
    let days = today.day() as i32 - target.day() as i32;

    if years > 0 {
        format!("{}y ago", years)
    } else if months > 0 {
        format!("{}mo ago", months)
    } else if days > 0 {
        format!("{}d ago", days)
    } else {
        "Today".to_string()
    }
}
