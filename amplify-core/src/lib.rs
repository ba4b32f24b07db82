//! amplify-core
//!
//! Estimation engine shared across the amplify ecosystem.
//!
//! - `cursor`: mapping between opaque pagination cursors and instants.
//! - `bounds`: per-account follow-time bounds from chunked listings.
//! - `interpolate`: daily apportioning of follow credit into two series.
//! - `timefmt`: date formatting and day-granularity helpers.
//! - `source`: the `FollowerSource` and `CheckpointSink` seams.
//!
//! Everything except `source` is synchronous and pure over caller-supplied
//! data. The seams are async traits so that collection drivers can run them on
//! Tokio.
#![warn(missing_docs)]

/// Follow-time bound estimation.
pub mod bounds;
/// Injectable source of the current instant.
pub mod clock;
/// Cursor codec and its constants.
pub mod cursor;
/// Follow-credit interpolation.
pub mod interpolate;
/// Follower source and checkpoint traits implemented by collaborators.
pub mod source;
/// Date formatting helpers.
pub mod timefmt;

pub use bounds::estimate_time_bounds;
pub use clock::{Clock, FixedClock, SystemClock};
pub use cursor::{decode, decode_with, encode};
pub use interpolate::{FALLBACK_FOLLOW_NUDGE, already_followed, interpolate_gains};
pub use source::{CheckpointSink, CheckpointTag, FollowerPage, FollowerSource};
pub use timefmt::{day_range, reformat, stamp, truncate_to_day};

pub use amplify_types::*;
