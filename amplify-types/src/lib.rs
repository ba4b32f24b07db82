//! Amplify-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod account;
mod bounds;
mod config;
mod cursor;
mod error;
mod listing;
mod lookup;
mod reports;
mod series;

pub use account::{AccountEntry, AccountId, AccountSet};
pub use bounds::{TimeBound, TimeBounds};
pub use config::{AmplifyConfig, BackoffConfig, CollectionConfig};
pub use cursor::Cursor;
pub use error::AmplifyError;
pub use listing::ChunkedListing;
pub use lookup::{BrokerFollowTimes, RetweetCursors};
pub use reports::{Collection, StopReason};
pub use series::{DailySeries, GainEstimate, QueryWindow};
