//! Amplify estimates how many of the followers an account gains in a time
//! window already followed a second ("broker") account.
//!
//! Overview
//! - Pages follower listings from a [`FollowerSource`](amplify_core::FollowerSource),
//!   newest first, keeping each page under the cursor it was requested with.
//! - Retries rate limits and transient failures with exponential backoff and
//!   jitter, supports cooperative cancellation, and checkpoints long runs.
//! - Turns chunked listings into per-account follow-time bounds and spreads
//!   one unit of follow credit per account across the days its bound allows.
//!
//! Key behaviors and trade-offs
//! - Window collection starts at `after + window` and stops at `after`; full
//!   collection starts at "now" and runs until the listing is exhausted.
//! - Protected and deleted accounts stop a run but keep the pages gathered so
//!   far; a page failing past the retry budget does the same.
//! - Estimates are day-granular. Accounts whose bound misses the query window
//!   carry no credit and are reported as unplaced.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use amplify::{Amplify, BrokerContext};
//!
//! let amplify = Amplify::builder()
//!     .with_source(Arc::new(MyApiSource::new(token)))
//!     .checkpoint_dir("checkpoints")
//!     .build()?;
//!
//! let collection = amplify.collect_window("some_author", retweeted_at).await;
//! let window = amplify::QueryWindow::starting_at(retweeted_at.date_naive(), 14)?;
//! let analysis = amplify.analyze(
//!     [&collection.listing],
//!     &window,
//!     &BrokerContext { broker: &broker, follows: &follows, retweets: &retweets },
//! )?;
//! println!("{}", analysis.daily_rows());
//! ```
#![warn(missing_docs)]

mod analysis;
mod backoff;
mod checkpoint;
mod collect;
mod core;

pub use crate::analysis::{Analysis, BrokerContext, analyze_with};
pub use crate::backoff::Backoff;
pub use crate::checkpoint::JsonDirCheckpoint;
pub use crate::collect::CollectRequest;
pub use crate::core::{Amplify, AmplifyBuilder};

pub use amplify_core::{
    CheckpointSink, CheckpointTag, Clock, FixedClock, FollowerPage, FollowerSource, SystemClock,
};
pub use amplify_types::{
    AccountEntry, AccountId, AccountSet, AmplifyConfig, AmplifyError, BackoffConfig,
    BrokerFollowTimes, ChunkedListing, Collection, CollectionConfig, Cursor, DailySeries,
    GainEstimate, QueryWindow, RetweetCursors, StopReason, TimeBound, TimeBounds,
};
