//! Record date parsing.
//!
//! The extraction feed is not consistent about date encoding: the same field
//! can arrive as `2024/01/10`, `2024-01-10`, `20240110`, or any of those with
//! a trailing time. Parsing tries the known layouts in order and, when a time
//! is present, also yields the `HH:MM` time point used for multi-reading
//! merges.

use chrono::{NaiveDate, NaiveDateTime};

use labclip_model::RawLabRecord;

const DATETIME_FORMATS: [&str; 6] = [
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y%m%d%H%M%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y/%m/%d", "%Y-%m-%d", "%Y%m%d"];

/// Parse a feed date string into a date and, when present, an `HH:MM`
/// time point. Returns `None` when no known layout matches.
pub fn parse_date_time(raw: &str) -> Option<(NaiveDate, Option<String>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            let time_point = datetime.format("%H:%M").to_string();
            return Some((datetime.date(), Some(time_point)));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some((date, None));
        }
    }
    None
}

/// The date a record's clinical fact belongs to: the inspection date when
/// parseable, falling back to the prescription date.
pub fn record_date(record: &RawLabRecord) -> Option<(NaiveDate, Option<String>)> {
    parse_date_time(&record.inspect_date).or_else(|| parse_date_time(&record.recipe_date))
}
