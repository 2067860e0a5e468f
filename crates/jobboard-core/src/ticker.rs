use chrono::{NaiveDateTime, TimeDelta};

use crate::dates::{end_of_day, format_date};
use crate::model::JobRecord;

const URGENT_WINDOW_HOURS: i64 = 48;

/// Ticker items: last-chance warnings for jobs closing within 48 hours, followed by
/// every non-blank `news` cell in feed order.
pub fn ticker_items(records: &[JobRecord], now: NaiveDateTime) -> Vec<String> {
    let window = TimeDelta::hours(URGENT_WINDOW_HOURS);

    let urgent = records.iter().filter_map(|job| {
        let deadline = job.deadline?;
        let remaining = end_of_day(deadline) - now;
        (remaining > TimeDelta::zero() && remaining <= window).then(|| {
            format!(
                "⚠️ Last Chance: {} closes on {}!",
                job.title,
                format_date(deadline)
            )
        })
    });

    let news = records
        .iter()
        .filter_map(|job| job.news.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    urgent.chain(news).collect()
}
