//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

/// Date only, as shown in the post listing (`2023-06-01`)
pub fn list_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}

/// Date shown in a post header: `1st Jun` within `current_year`,
/// `1st Jun 2023` otherwise
pub fn display_date<Tz: TimeZone>(date: &DateTime<Tz>, current_year: i32) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let day = ordinal(date.day());
    if date.year() == current_year {
        format!("{} {}", day, date.format("%b"))
    } else {
        format!("{} {}", day, date.format("%b %Y"))
    }
}

/// English ordinal of a day of month (`1st`, `22nd`, `13th`)
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
