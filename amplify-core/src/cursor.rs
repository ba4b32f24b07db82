//! Mapping between opaque pagination cursors and instants.
//!
//! The follower-listing API encodes a day count into its cursors with an
//! undocumented linear transform anchored at the platform's first post:
//!
//! ```text
//! instant = REFERENCE_INSTANT + (cursor - CURSOR_OFFSET) / CURSOR_DAY_SCALE days
//! ```
//!
//! Decoding keeps sub-day precision; encoding only carries whole days, so a
//! round trip is exact to the calendar day and no finer.

use chrono::{DateTime, TimeDelta, Utc};

use crate::Cursor;
use crate::clock::{Clock, SystemClock};

/// Cursor units per day of wall time.
pub const CURSOR_DAY_SCALE: i64 = 90_595_920_000_000;

/// Cursor value corresponding to [`REFERENCE_INSTANT`].
pub const CURSOR_OFFSET: i64 = 1_230_427_978_203_430_000;

/// Unix seconds of the platform's first post, 2007-03-09T07:51:00Z.
const REFERENCE_UNIX_SECS: i64 = 1_173_426_660;

/// Unix seconds of the platform epoch origin, 2006-01-01T00:00:00Z.
const EPOCH_ORIGIN_UNIX_SECS: i64 = 1_136_073_600;

const MICROS_PER_DAY: i128 = 86_400_000_000;

/// Anchor of the cursor transform.
pub const REFERENCE_INSTANT: DateTime<Utc> =
    match DateTime::from_timestamp(REFERENCE_UNIX_SECS, 0) {
        Some(t) => t,
        None => panic!("reference instant out of range"),
    };

/// Instant denoted by [`Cursor::ORIGIN`].
pub const EPOCH_ORIGIN: DateTime<Utc> = match DateTime::from_timestamp(EPOCH_ORIGIN_UNIX_SECS, 0)
{
    Some(t) => t,
    None => panic!("epoch origin out of range"),
};

/// Decode `cursor` using the wall clock for [`Cursor::NOW`].
///
/// See [`decode_with`].
#[must_use]
pub fn decode(cursor: Cursor) -> DateTime<Utc> {
    decode_with(cursor, &SystemClock)
}

/// Decode `cursor` to an instant, reading "now" from `clock`.
///
/// - [`Cursor::NOW`] (`-1`) maps to `clock.now()`.
/// - [`Cursor::ORIGIN`] (`0`) maps to [`EPOCH_ORIGIN`].
/// - Values below `-2` are negated first; the API hands out previous-page
///   cursors as negatives of forward cursors.
/// - Anything else goes through the linear transform.
///
/// Never fails. Malformed cursors decode to meaningless instants, saturating
/// at the representable range.
///
/// ```
/// use amplify_core::{Cursor, cursor::{decode, EPOCH_ORIGIN}};
/// assert_eq!(decode(Cursor::ORIGIN), EPOCH_ORIGIN);
/// assert_eq!(decode(Cursor::new(-1_770_198_469_563_430_000)), decode(Cursor::new(1_770_198_469_563_430_000)));
/// ```
pub fn decode_with<C: Clock + ?Sized>(cursor: Cursor, clock: &C) -> DateTime<Utc> {
    let raw = match cursor.get() {
        -1 => return clock.now(),
        0 => return EPOCH_ORIGIN,
        c if c < -2 => c.saturating_neg(),
        c => c,
    };

    let delta = i128::from(raw) - i128::from(CURSOR_OFFSET);
    let micros = delta * MICROS_PER_DAY / i128::from(CURSOR_DAY_SCALE);
    let Ok(micros) = i64::try_from(micros) else {
        return saturate(micros.is_negative());
    };
    REFERENCE_INSTANT
        .checked_add_signed(TimeDelta::microseconds(micros))
        .unwrap_or_else(|| saturate(micros.is_negative()))
}

/// Encode `ts` as the cursor of its calendar day.
///
/// The day delta is taken between the UTC calendar days of `ts` and
/// [`REFERENCE_INSTANT`], so the decoded cursor lands on the same day as `ts`
/// (at the reference time of day). Saturates instead of overflowing.
///
/// Upstream tooling truncates `ts - REFERENCE_INSTANT` to whole days instead,
/// so instants before 07:51 UTC encode one day later here than there.
///
/// ```
/// use amplify_core::cursor::{decode, encode};
/// use chrono::{TimeZone, Utc};
/// let t = Utc.with_ymd_and_hms(2023, 7, 1, 3, 15, 0).unwrap();
/// assert_eq!(decode(encode(t)).date_naive(), t.date_naive());
/// ```
#[must_use]
pub fn encode(ts: DateTime<Utc>) -> Cursor {
    let days = (ts.date_naive() - REFERENCE_INSTANT.date_naive()).num_days();
    Cursor::new(
        days.saturating_mul(CURSOR_DAY_SCALE)
            .saturating_add(CURSOR_OFFSET),
    )
}

const fn saturate(negative: bool) -> DateTime<Utc> {
    if negative {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    }
}
