//! Date formatting and day-granularity helpers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Reformat a `YYYY-MM-DD` string as `YYYYMMDD`.
///
/// Works by position only and performs no validation; malformed input yields
/// malformed output. Missing positions contribute nothing.
///
/// ```
/// assert_eq!(amplify_core::reformat("2023-07-04"), "20230704");
/// assert_eq!(amplify_core::reformat("2023-07"), "202307");
/// ```
#[must_use]
pub fn reformat(date: &str) -> String {
    let slice = |from: usize, to: usize| {
        let to = to.min(date.len());
        date.get(from..to).unwrap_or_default()
    };
    let mut out = String::with_capacity(8);
    out.push_str(slice(0, 4));
    out.push_str(slice(5, 7));
    out.push_str(slice(8, 10));
    out
}

/// `YYYYMMDD` stamp of the UTC calendar day of `ts`.
#[must_use]
pub fn stamp(ts: DateTime<Utc>) -> String {
    reformat(&ts.date_naive().to_string())
}

/// Midnight UTC of the day containing `ts`.
#[must_use]
pub fn truncate_to_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Every day from `first` to `last`, both inclusive; empty if `first > last`.
pub fn day_range(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |d| *d <= last)
}
