//! Opaque pagination cursors.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque paging token returned by the follower-listing API.
///
/// Cursors are monotonically related to time but are not timestamps; use the
/// codec in `amplify-core` to map them to instants. Ordering is by raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub i64);

impl Cursor {
    /// Sentinel meaning "the current instant".
    pub const NOW: Self = Self(-1);
    /// Sentinel meaning the platform's epoch origin.
    pub const ORIGIN: Self = Self(0);

    /// Construct a cursor from its raw value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Shift the raw value by `delta`, saturating at the integer bounds.
    #[must_use]
    pub const fn saturating_add(self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl From<i64> for Cursor {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<Cursor> for i64 {
    fn from(c: Cursor) -> Self {
        c.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
