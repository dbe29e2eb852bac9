//! Timestamp parsing shared by the form models and the request handlers.
//!
//! The wire format is RFC 3339. Date-only values (`2024-03-01`) are accepted
//! on input and expanded to midnight UTC.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date
pub fn parse_flexible(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(timestamp);
    }

    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Complete timestamp representation, e.g. `2024-03-01T00:00:00Z`
pub fn to_timestamp(value: OffsetDateTime) -> String {
    // Rfc3339 formatting only fails for years outside 0..=9999
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

/// Short display form used on task cards, e.g. `Mar 01, 2024`
pub fn to_display(value: OffsetDateTime) -> String {
    let month = match value.month() {
        time::Month::January => "Jan",
        time::Month::February => "Feb",
        time::Month::March => "Mar",
        time::Month::April => "Apr",
        time::Month::May => "May",
        time::Month::June => "Jun",
        time::Month::July => "Jul",
        time::Month::August => "Aug",
        time::Month::September => "Sep",
        time::Month::October => "Oct",
        time::Month::November => "Nov",
        time::Month::December => "Dec",
    };
    format!("{} {:02}, {}", month, value.day(), value.year())
}
