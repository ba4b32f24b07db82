//! Per-account follow-time bounds.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Best-effort interval during which an account's follow event happened.
///
/// `high` starts at the instant the account was first seen and only moves
/// down; `low` is unknown until a preceding chunk boundary exists and only
/// moves up afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBound {
    /// Earliest instant the follow may have happened, if known.
    pub low: Option<DateTime<Utc>>,
    /// Latest instant the follow may have happened.
    pub high: DateTime<Utc>,
}

impl TimeBound {
    /// A bound with no lower limit and `high` at `now`.
    #[must_use]
    pub const fn open(now: DateTime<Utc>) -> Self {
        Self { low: None, high: now }
    }

    /// Raise `low` to `candidate`, or set it if it was unknown.
    pub fn raise_low(&mut self, candidate: DateTime<Utc>) {
        self.low = Some(match self.low {
            Some(low) => low.max(candidate),
            None => candidate,
        });
    }

    /// Lower `high` to `candidate` if it is earlier.
    pub fn tighten_high(&mut self, candidate: DateTime<Utc>) {
        self.high = self.high.min(candidate);
    }

    /// Returns true if `low <= high` (or `low` is unknown).
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.low.is_none_or(|low| low <= self.high)
    }
}

/// Accumulator of bounds across estimator passes, keyed by account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeBounds {
    inner: HashMap<AccountId, TimeBound>,
}

impl TimeBounds {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bound recorded for `account`.
    #[must_use]
    pub fn get(&self, account: &AccountId) -> Option<&TimeBound> {
        self.inner.get(account)
    }

    /// Returns the bound for `account`, creating an open one at `now` on first sight.
    pub fn entry_or_open(&mut self, account: AccountId, now: DateTime<Utc>) -> &mut TimeBound {
        self.inner
            .entry(account)
            .or_insert_with(|| TimeBound::open(now))
    }

    /// Record `bound` for `account`, replacing any previous value.
    pub fn insert(&mut self, account: AccountId, bound: TimeBound) -> Option<TimeBound> {
        self.inner.insert(account, bound)
    }

    /// Number of accounts with a recorded bound.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no bound has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate recorded bounds in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&AccountId, &TimeBound)> {
        self.inner.iter()
    }
}
