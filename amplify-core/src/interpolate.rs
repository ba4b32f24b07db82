//! Daily apportioning of follow credit across uncertain follow times.

use amplify_types::{
    AccountId, AccountSet, AmplifyError, BrokerFollowTimes, Cursor, GainEstimate, QueryWindow,
    RetweetCursors, TimeBounds,
};

use crate::timefmt::day_range;

/// Cursor units added to the retweet reference when an account's broker-follow
/// time is unknown; the account is then assumed to have followed the broker
/// just after the retweet.
pub const FALLBACK_FOLLOW_NUDGE: i64 = 5;

/// Spread one unit of follow credit per account across the days its bound
/// allows, split by whether the account already followed `broker`.
///
/// For each account in `accumulated`:
/// - the day range runs from `max(window.start, bound.low)` (or `window.start`
///   when `low` is unknown) to `min(bound.high, last day of window)`, inclusive;
/// - the broker-follow cursor comes from `broker_follows`, or defaults to the
///   broker's retweet reference plus [`FALLBACK_FOLLOW_NUDGE`];
/// - a broker-follow cursor at or before the reference credits the
///   already-following series, anything later the not-following series;
/// - each day in the range receives `1 / n`.
///
/// Accounts whose range is empty contribute nothing and are listed in
/// [`GainEstimate::unplaced`]; their credit is not redistributed.
///
/// Both series carry one entry per day of `window`, zero by default.
///
/// # Errors
/// - `NotFound` if `retweets` has no reference cursor for `broker`.
/// - `Data` if an account of `accumulated` has no bound in `bounds`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "amplify_core::interpolate::interpolate_gains",
        skip_all,
        fields(accounts = accumulated.len(), broker = %broker, window = ?window),
    )
)]
pub fn interpolate_gains(
    accumulated: &AccountSet,
    window: &QueryWindow,
    bounds: &TimeBounds,
    broker_follows: &BrokerFollowTimes,
    retweets: &RetweetCursors,
    broker: &AccountId,
) -> Result<GainEstimate, AmplifyError> {
    let reference = retweets
        .reference_for(broker)
        .ok_or_else(|| AmplifyError::not_found(format!("retweet cursor for broker {broker}")))?;

    let mut estimate = GainEstimate::zeroed(window);

    for account in accumulated {
        let bound = bounds
            .get(account)
            .ok_or_else(|| AmplifyError::Data(format!("no time bound for account {account}")))?;

        let first = bound
            .low
            .map_or(window.start(), |low| window.start().max(low.date_naive()));
        let last = window
            .last_day()
            .map(|last| last.min(bound.high.date_naive()));

        let days: Vec<_> = match last {
            Some(last) => day_range(first, last).collect(),
            None => Vec::new(),
        };
        if days.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(account = %account, "bound does not intersect window; no credit placed");
            estimate.unplaced.push(account.clone());
            continue;
        }

        let series = if already_followed(broker_follows.get(account), reference) {
            &mut estimate.already_following
        } else {
            &mut estimate.not_following
        };
        #[allow(clippy::cast_precision_loss)]
        let share = 1.0 / days.len() as f64;
        for day in days {
            series.add(day, share);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        already_following = estimate.already_following.total(),
        not_following = estimate.not_following.total(),
        unplaced = estimate.unplaced.len(),
        "interpolated follower gains"
    );

    Ok(estimate)
}

/// Classify a broker-follow cursor against the retweet reference.
///
/// Unknown follow times default to `reference + FALLBACK_FOLLOW_NUDGE`.
#[must_use]
pub fn already_followed(followed_at: Option<Cursor>, reference: Cursor) -> bool {
    let followed_at =
        followed_at.unwrap_or_else(|| reference.saturating_add(FALLBACK_FOLLOW_NUDGE));
    followed_at <= reference
}
