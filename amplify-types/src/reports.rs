//! Report envelopes produced by the collection driver.

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::error::AmplifyError;
use crate::listing::ChunkedListing;

/// Why a collection run stopped paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StopReason {
    /// The decoded cursor reached the start of the requested window.
    WindowStart,
    /// The source returned no further cursor, or repeated the current one.
    Exhausted,
    /// The account's followers are not visible (protected account).
    NotAuthorized,
    /// The account no longer exists.
    AccountDeleted,
    /// The caller cancelled the run.
    Cancelled,
    /// A page kept failing past the retry budget.
    Failed(AmplifyError),
}

impl StopReason {
    /// Returns true if the run covered everything it was asked to.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::WindowStart | Self::Exhausted)
    }
}

/// Outcome of one collection run.
///
/// The listing is always returned, including on early stops, so partial data
/// can still feed the estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Account handle that was paged.
    pub account: String,
    /// Chunks gathered, keyed by the cursor each page was requested with.
    pub listing: ChunkedListing,
    /// Pages successfully fetched.
    pub pages: u64,
    /// Cursor that would have been requested next, if paging stopped early.
    pub resume_cursor: Option<Cursor>,
    /// Why paging stopped.
    pub stop: StopReason,
    /// Non-fatal issues (retried failures, checkpoint write errors).
    pub warnings: Vec<AmplifyError>,
}
