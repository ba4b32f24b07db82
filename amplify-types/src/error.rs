use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the amplify workspace.
///
/// This wraps argument validation errors, inconsistent input data, follower
/// source failures (rate limits, protected or deleted accounts), and the
/// terminal states of the collection driver.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AmplifyError {
    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with supplied data (an account without a time bound, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// A required lookup entry could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing entry, e.g. "retweet cursor for broker 42".
        what: String,
    },

    /// A follower source returned an error.
    #[error("{source_name} failed: {msg}")]
    Source {
        /// Source name that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The upstream API asked the caller to slow down.
    #[error("rate limited: retry_after_ms={retry_after_ms:?}")]
    RateLimited {
        /// Server-suggested wait in milliseconds, when the API provides one.
        retry_after_ms: Option<u64>,
    },

    /// The account's follower list is not visible to the caller.
    #[error("not authorized to read followers of {account}")]
    NotAuthorized {
        /// Account handle that was requested.
        account: String,
    },

    /// The account no longer exists upstream.
    #[error("account deleted: {account}")]
    AccountDeleted {
        /// Account handle that was requested.
        account: String,
    },

    /// A retryable failure persisted past the configured retry budget.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made for the failing page.
        attempts: u32,
        /// The final error observed.
        last: Box<AmplifyError>,
    },

    /// The operation was cancelled by the caller.
    #[error("cancelled")]
    Cancelled,

    /// Persisting an intermediate listing failed.
    #[error("checkpoint failed: {0}")]
    Checkpoint(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl AmplifyError {
    /// Helper: build a `Source` error with the source name and message.
    pub fn source(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing entry.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `RateLimited` error.
    #[must_use]
    pub const fn rate_limited(retry_after_ms: Option<u64>) -> Self {
        Self::RateLimited { retry_after_ms }
    }

    /// Returns true if the collection driver should back off and retry the same page.
    ///
    /// Protected and deleted accounts are terminal; generic source failures and
    /// rate limits are retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Source { .. })
    }

    /// Returns true if the error means the account cannot be read any further.
    #[must_use]
    pub const fn is_account_terminal(&self) -> bool {
        matches!(self, Self::NotAuthorized { .. } | Self::AccountDeleted { .. })
    }
}

impl From<serde_json::Error> for AmplifyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Data(e.to_string())
    }
}

impl From<std::io::Error> for AmplifyError {
    fn from(e: std::io::Error) -> Self {
        Self::Checkpoint(e.to_string())
    }
}
