//! Mock follower sources and checkpoint sinks for CI-safe tests and examples.
//!
//! - [`TimelineSource`] serves pages from a fixed set of follow days.
//! - [`DynamicMockSource`] defers every page to behaviors scripted through a
//!   [`DynamicMockController`].
//! - [`MemoryCheckpoints`] keeps every saved listing in memory.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use amplify_core::{AmplifyError, CheckpointSink, CheckpointTag, ChunkedListing};

mod dynamic;
mod timeline;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior, PageRequest};
pub use timeline::TimelineSource;

/// A checkpoint as captured by [`MemoryCheckpoints`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCheckpoint {
    /// Account handle the listing belongs to.
    pub account: String,
    /// Anchor instant of the run.
    pub anchor: DateTime<Utc>,
    /// Pages fetched when the checkpoint was taken.
    pub pages: u64,
    /// True for the save made when the run stopped.
    pub last: bool,
    /// Snapshot of the listing.
    pub listing: ChunkedListing,
}

/// Checkpoint sink recording every save in memory.
///
/// Clones share the same log. Setting a failure makes every later save
/// return it.
#[derive(Clone, Default)]
pub struct MemoryCheckpoints {
    saved: Arc<Mutex<Vec<SavedCheckpoint>>>,
    failure: Arc<Mutex<Option<AmplifyError>>>,
}

impl MemoryCheckpoints {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `save` fail with `err`, or succeed again with `None`.
    pub async fn set_failure(&self, err: Option<AmplifyError>) {
        *self.failure.lock().await = err;
    }

    /// Return a copy of every checkpoint saved so far.
    pub async fn saved(&self) -> Vec<SavedCheckpoint> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl CheckpointSink for MemoryCheckpoints {
    async fn save(
        &self,
        tag: CheckpointTag<'_>,
        listing: &ChunkedListing,
    ) -> Result<(), AmplifyError> {
        if let Some(err) = self.failure.lock().await.clone() {
            return Err(err);
        }
        self.saved.lock().await.push(SavedCheckpoint {
            account: tag.account.to_string(),
            anchor: tag.anchor,
            pages: tag.pages,
            last: tag.last,
            listing: listing.clone(),
        });
        Ok(())
    }
}
