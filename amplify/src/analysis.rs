use serde_json::Value;

use amplify_core::{Clock, estimate_time_bounds, interpolate_gains};
use amplify_types::{
    AccountId, AccountSet, AmplifyError, BrokerFollowTimes, ChunkedListing, GainEstimate,
    QueryWindow, RetweetCursors, TimeBounds,
};

use crate::core::Amplify;

/// Reference data classifying gained followers against one broker.
#[derive(Debug, Clone, Copy)]
pub struct BrokerContext<'a> {
    /// The broker account.
    pub broker: &'a AccountId,
    /// When known accounts followed the broker.
    pub follows: &'a BrokerFollowTimes,
    /// Retweet reference cursors keyed by broker.
    pub retweets: &'a RetweetCursors,
}

/// Result of running the estimator and the interpolation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Every account seen in the listings.
    pub accumulated: AccountSet,
    /// Follow-time bounds after all listings were applied.
    pub bounds: TimeBounds,
    /// Daily gain estimate over the query window.
    pub estimate: GainEstimate,
}

impl Analysis {
    /// Flat JSON summary: one row per window day with both series.
    #[must_use]
    pub fn daily_rows(&self) -> Value {
        let rows: Vec<Value> = self
            .estimate
            .already_following
            .iter()
            .map(|(day, already)| {
                serde_json::json!({
                    "day": day.to_string(),
                    "already_following": already,
                    "not_following": self.estimate.not_following.get(day).unwrap_or(0.0),
                })
            })
            .collect();
        Value::Array(rows)
    }
}

/// Feed `listings` through the bound estimator, then interpolate over `window`.
///
/// Listings are applied in iteration order against one shared bounds map, so
/// later listings can only tighten what earlier ones established.
///
/// # Errors
/// Propagates `NotFound` when the broker has no retweet reference and `Data`
/// when an accumulated account lacks a bound.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "amplify::analysis::analyze_with",
        skip_all,
        fields(broker = %ctx.broker, window = ?window),
    )
)]
pub fn analyze_with<'l, C, I>(
    clock: &C,
    listings: I,
    window: &QueryWindow,
    ctx: &BrokerContext<'_>,
) -> Result<Analysis, AmplifyError>
where
    C: Clock + ?Sized,
    I: IntoIterator<Item = &'l ChunkedListing>,
{
    let mut bounds = TimeBounds::new();
    let mut accumulated = AccountSet::new();
    for listing in listings {
        accumulated.extend(estimate_time_bounds(listing, &mut bounds, clock));
    }
    let estimate = interpolate_gains(
        &accumulated,
        window,
        &bounds,
        ctx.follows,
        ctx.retweets,
        ctx.broker,
    )?;
    Ok(Analysis {
        accumulated,
        bounds,
        estimate,
    })
}

impl Amplify {
    /// Estimate daily gains from `listings` using this orchestrator's clock.
    ///
    /// # Errors
    /// See [`analyze_with`].
    pub fn analyze<'l, I>(
        &self,
        listings: I,
        window: &QueryWindow,
        ctx: &BrokerContext<'_>,
    ) -> Result<Analysis, AmplifyError>
    where
        I: IntoIterator<Item = &'l ChunkedListing>,
    {
        analyze_with(&*self.clock, listings, window, ctx)
    }
}
