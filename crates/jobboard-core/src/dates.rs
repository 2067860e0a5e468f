//! Best-effort calendar-date parsing for feed cells.
//!
//! Spreadsheet exports are inconsistent about date formats, so a fixed list of
//! layouts is tried in order. Time-of-day, when present, is discarded.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("empty date")]
    Empty,

    #[error("unrecognized date: {0}")]
    Unrecognized(String),
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d %B, %Y",
    "%d %b, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Ok(date);
        }
    }

    Err(DateError::Unrecognized(text.to_string()))
}

/// Format as `DD-MM-YYYY`, the layout shown on cards and in the ticker.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Last representable millisecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

pub fn start_of_day(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_dates() {
        assert_eq!(parse_date("2024-01-10"), Ok(ymd(2024, 1, 10)));
        assert_eq!(parse_date(" 2024/03/05 "), Ok(ymd(2024, 3, 5)));
    }

    #[test]
    fn datetimes_keep_only_the_date() {
        assert_eq!(parse_date("2024-01-10T18:30:00Z"), Ok(ymd(2024, 1, 10)));
        assert_eq!(parse_date("2024-01-10T18:30"), Ok(ymd(2024, 1, 10)));
        assert_eq!(parse_date("2024-01-10 09:15:00"), Ok(ymd(2024, 1, 10)));
    }

    #[test]
    fn slash_dates_are_month_first() {
        assert_eq!(parse_date("03/04/2024"), Ok(ymd(2024, 3, 4)));
    }

    #[test]
    fn dash_dates_are_day_first() {
        assert_eq!(parse_date("25-12-2024"), Ok(ymd(2024, 12, 25)));
        assert_eq!(parse_date("25.12.2024"), Ok(ymd(2024, 12, 25)));
    }

    #[test]
    fn month_names() {
        assert_eq!(parse_date("January 5, 2025"), Ok(ymd(2025, 1, 5)));
        assert_eq!(parse_date("Jan 5 2025"), Ok(ymd(2025, 1, 5)));
        assert_eq!(parse_date("5 March 2025"), Ok(ymd(2025, 3, 5)));
        assert_eq!(parse_date("15 Aug, 2025"), Ok(ymd(2025, 8, 15)));
    }

    #[test]
    fn failures() {
        assert_eq!(parse_date("   "), Err(DateError::Empty));
        assert_eq!(
            parse_date("next week"),
            Err(DateError::Unrecognized("next week".to_string()))
        );
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn formats_day_first() {
        assert_eq!(format_date(ymd(2024, 1, 9)), "09-01-2024");
    }

    #[test]
    fn day_bounds() {
        let date = ymd(2024, 6, 1);
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(start_of_day(noon), date.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end_of_day(date), date.and_hms_milli_opt(23, 59, 59, 999).unwrap());
    }
}
