//! Reference lookups used to classify gained followers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::cursor::Cursor;

/// Cursor positions of amplification events, keyed by broker account.
///
/// Each broker maps to a list whose first element is the reference cursor of
/// the retweet or quote being analysed; later elements are carried along
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetweetCursors {
    inner: HashMap<AccountId, Vec<Cursor>>,
}

impl RetweetCursors {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the cursor list for `broker`.
    pub fn insert(&mut self, broker: AccountId, cursors: Vec<Cursor>) -> Option<Vec<Cursor>> {
        self.inner.insert(broker, cursors)
    }

    /// The reference cursor (first list element) for `broker`.
    #[must_use]
    pub fn reference_for(&self, broker: &AccountId) -> Option<Cursor> {
        self.inner.get(broker).and_then(|v| v.first().copied())
    }

    /// Every cursor recorded for `broker`.
    #[must_use]
    pub fn all_for(&self, broker: &AccountId) -> Option<&[Cursor]> {
        self.inner.get(broker).map(Vec::as_slice)
    }
}

impl FromIterator<(AccountId, Vec<Cursor>)> for RetweetCursors {
    fn from_iter<T: IntoIterator<Item = (AccountId, Vec<Cursor>)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Cursor-comparable instants at which accounts followed the broker.
///
/// Partial by nature: accounts missing here fall back to a heuristic in the
/// interpolation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrokerFollowTimes {
    inner: HashMap<AccountId, Cursor>,
}

impl BrokerFollowTimes {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record when `account` followed the broker.
    pub fn insert(&mut self, account: AccountId, at: Cursor) -> Option<Cursor> {
        self.inner.insert(account, at)
    }

    /// When `account` followed the broker, if known.
    #[must_use]
    pub fn get(&self, account: &AccountId) -> Option<Cursor> {
        self.inner.get(account).copied()
    }

    /// Number of known accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no account is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<(AccountId, Cursor)> for BrokerFollowTimes {
    fn from_iter<T: IntoIterator<Item = (AccountId, Cursor)>>(iter: T) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
