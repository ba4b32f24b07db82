//! Chunked follower listings keyed by cursor.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::account::{AccountEntry, AccountSet};
use crate::cursor::Cursor;

/// Follower chunks keyed by the cursor that bounds them.
///
/// Each chunk lists accounts that followed before the instant encoded by its
/// cursor and after the instant of the next-older cursor. Chunks iterate in
/// ascending raw cursor order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkedListing {
    chunks: BTreeMap<Cursor, Vec<AccountEntry>>,
}

impl ChunkedListing {
    /// Create an empty listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a chunk under `cursor`, replacing any chunk already stored there.
    ///
    /// Returns the replaced chunk, if any.
    pub fn insert(
        &mut self,
        cursor: Cursor,
        entries: Vec<AccountEntry>,
    ) -> Option<Vec<AccountEntry>> {
        self.chunks.insert(cursor, entries)
    }

    /// Returns the chunk stored under `cursor`.
    #[must_use]
    pub fn get(&self, cursor: Cursor) -> Option<&[AccountEntry]> {
        self.chunks.get(&cursor).map(Vec::as_slice)
    }

    /// Number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true if the listing holds no chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total number of entries across chunks, duplicates included.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.chunks.values().map(Vec::len).sum()
    }

    /// Iterate chunks in ascending raw cursor order.
    pub fn iter(&self) -> impl Iterator<Item = (Cursor, &[AccountEntry])> {
        self.chunks.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// Cursors in ascending raw order.
    pub fn cursors(&self) -> impl Iterator<Item = Cursor> + '_ {
        self.chunks.keys().copied()
    }

    /// Deduplicated set of every account identifier in the listing.
    #[must_use]
    pub fn accounts(&self) -> AccountSet {
        self.chunks
            .values()
            .flatten()
            .map(|e| e.id().clone())
            .collect()
    }

    /// Fold `other` into this listing; entries of a shared cursor are appended.
    pub fn merge(&mut self, other: Self) {
        for (cursor, entries) in other.chunks {
            match self.chunks.entry(cursor) {
                Entry::Vacant(v) => {
                    v.insert(entries);
                }
                Entry::Occupied(mut o) => o.get_mut().extend(entries),
            }
        }
    }
}

impl FromIterator<(Cursor, Vec<AccountEntry>)> for ChunkedListing {
    fn from_iter<T: IntoIterator<Item = (Cursor, Vec<AccountEntry>)>>(iter: T) -> Self {
        let mut chunks: BTreeMap<Cursor, Vec<AccountEntry>> = BTreeMap::new();
        for (cursor, entries) in iter {
            chunks.entry(cursor).or_default().extend(entries);
        }
        Self { chunks }
    }
}

impl IntoIterator for ChunkedListing {
    type Item = (Cursor, Vec<AccountEntry>);
    type IntoIter = std::collections::btree_map::IntoIter<Cursor, Vec<AccountEntry>>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}
