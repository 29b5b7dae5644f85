// src/domain/calendar.rs

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses the date shapes found in the exports. Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Whole calendar months from `start` to `end`, one less when `end` has not
/// reached `start`'s day of month yet. May be zero or negative.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut months = (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);
    if end.day() < start.day() {
        months -= 1;
    }
    months
}

/// `YYYY-MM`
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Every month from `start`'s month to `end`'s month, both inclusive.
pub fn month_sequence(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let mut sequence = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());

    while (year, month) <= (end.year(), end.month()) {
        sequence.push(format!("{year:04}-{month:02}"));
        if month == 12 {
            month = 1;
            year += 1;
        } else {
            month += 1;
        }
    }
    sequence
}
