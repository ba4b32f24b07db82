//! Follow-time bound estimation from chunked listings.

use amplify_types::{AccountSet, ChunkedListing, TimeBounds};

use crate::clock::Clock;
use crate::cursor::decode_with;
use crate::timefmt::truncate_to_day;

/// Tighten per-account follow-time bounds using the chunks of `listing`.
///
/// Chunks are walked in ascending raw cursor order. Each chunk's cursor,
/// decoded and truncated to midnight, is an upper bound for every account in
/// it and becomes the lower bound for the next chunk. The first chunk has no
/// lower bound since the API only bounds pages from above.
///
/// `bounds` is updated in place and may already hold results of earlier
/// passes: `low` never decreases and `high` never increases. Accounts seen
/// for the first time start at `low = None`, `high = clock.now()`.
///
/// Returns the deduplicated set of accounts found in `listing`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "amplify_core::bounds::estimate_time_bounds",
        skip_all,
        fields(chunks = listing.len(), entries = listing.entry_count()),
    )
)]
pub fn estimate_time_bounds<C: Clock + ?Sized>(
    listing: &ChunkedListing,
    bounds: &mut TimeBounds,
    clock: &C,
) -> AccountSet {
    let now = clock.now();
    let mut accumulated = AccountSet::new();
    let mut low_date = None;

    for (cursor, entries) in listing.iter() {
        let high_date = truncate_to_day(decode_with(cursor, clock));
        for entry in entries {
            let id = entry.id();
            let bound = bounds.entry_or_open(id.clone(), now);
            if let Some(low) = low_date {
                bound.raise_low(low);
            }
            bound.tighten_high(high_date);
            if !accumulated.contains(id) {
                accumulated.insert(id.clone());
            }
        }
        low_date = Some(high_date);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        accounts = accumulated.len(),
        tracked = bounds.len(),
        "estimated follow-time bounds"
    );

    accumulated
}
