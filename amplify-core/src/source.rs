use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{AccountEntry, AmplifyError, ChunkedListing, Cursor};

/// One page of a follower listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowerPage {
    /// Accounts on this page, newest followers first.
    pub entries: Vec<AccountEntry>,
    /// Cursor of the next (older) page; `None` when the listing is exhausted.
    pub next_cursor: Option<Cursor>,
}

/// Upstream API serving follower listings page by page, newest first.
///
/// Implementations map transport failures onto [`AmplifyError`]:
/// rate limiting to `RateLimited`, protected accounts to `NotAuthorized`,
/// removed accounts to `AccountDeleted`, anything else to `Source`.
#[async_trait]
pub trait FollowerSource: Send + Sync {
    /// Stable name used in logs and error tags.
    fn name(&self) -> &'static str;

    /// Fetch the page of `account`'s followers starting at `cursor`.
    async fn follower_page(
        &self,
        account: &str,
        cursor: Cursor,
        page_size: u32,
    ) -> Result<FollowerPage, AmplifyError>;
}

/// Identifies one checkpoint of a collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointTag<'a> {
    /// Account handle being paged.
    pub account: &'a str,
    /// Instant the run is anchored at: the start of a window collection, or
    /// the starting time of a full collection.
    pub anchor: DateTime<Utc>,
    /// Pages fetched so far.
    pub pages: u64,
    /// True for the save made when the run stops.
    pub last: bool,
}

/// Persistence for partial listings during long collection runs.
#[async_trait]
pub trait CheckpointSink: Send + Sync {
    /// Persist the listing gathered so far.
    async fn save(
        &self,
        tag: CheckpointTag<'_>,
        listing: &ChunkedListing,
    ) -> Result<(), AmplifyError>;
}
