//! Account identifiers as they appear in follower listings.

use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque account identifier.
///
/// Listings carry identifiers either as integers (id-only endpoints) or as
/// strings; both forms are accepted and normalized to the decimal string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Construct an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for AccountId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// One element of a follower chunk: a bare identifier or a user record.
///
/// Record payloads may carry arbitrary extra fields; only `id` is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountEntry {
    /// Bare identifier, as returned by id-only endpoints.
    Id(AccountId),
    /// User record with an identifier field.
    Record {
        /// Identifier of the account.
        id: AccountId,
    },
}

impl AccountEntry {
    /// Returns the identifier regardless of the entry's shape.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        match self {
            Self::Id(id) | Self::Record { id } => id,
        }
    }

    /// Consume the entry and return its identifier.
    #[must_use]
    pub fn into_id(self) -> AccountId {
        match self {
            Self::Id(id) | Self::Record { id } => id,
        }
    }
}

impl From<AccountId> for AccountEntry {
    fn from(id: AccountId) -> Self {
        Self::Id(id)
    }
}

impl From<u64> for AccountEntry {
    fn from(id: u64) -> Self {
        Self::Id(AccountId::from(id))
    }
}

/// Deduplicated set of accounts observed across all chunks of a listing.
pub type AccountSet = BTreeSet<AccountId>;
