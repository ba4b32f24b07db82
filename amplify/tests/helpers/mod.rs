// Shared fixtures so tests can `mod helpers; use helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use amplify::{Amplify, AmplifyBuilder, BackoffConfig, FixedClock};
use amplify_core::FollowerSource;

pub const AUTHOR: &str = "author";
pub const BROKER: &str = "broker";

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> chrono::DateTime<chrono::Utc> {
    let date = chrono::NaiveDate::from_ymd_opt(y, m, d).expect("invalid date");
    let naive = date
        .and_hms_opt(hh, mm, ss)
        .expect("invalid time components");
    chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(naive, chrono::Utc)
}

/// Calendar day shorthand.
pub fn day(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).expect("invalid date")
}

/// Backoff with short, jitter-free delays so paused-time tests are exact.
pub const fn fast_backoff() -> BackoffConfig {
    BackoffConfig {
        min_backoff_ms: 1_000,
        max_backoff_ms: 8_000,
        factor: 2,
        jitter_percent: 0,
    }
}

/// Builder with `source`, a frozen clock at `now`, and fast backoff.
pub fn builder(source: Arc<dyn FollowerSource>, now: chrono::DateTime<chrono::Utc>) -> AmplifyBuilder {
    Amplify::builder()
        .with_source(source)
        .with_clock(Arc::new(FixedClock(now)))
        .backoff(fast_backoff())
        .window(Duration::from_secs(14 * 86_400))
}
