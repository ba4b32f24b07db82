//! Configuration types shared by the collection driver and its callers.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AmplifyError;

/// Exponential backoff configuration for retrying rate-limited or failed pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor to increase delay after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 60_000,
            // upstream rate-limit windows are 15 minutes
            max_backoff_ms: 15 * 60_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

impl BackoffConfig {
    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `factor` is zero, `jitter_percent` exceeds 100,
    /// or `min_backoff_ms` exceeds `max_backoff_ms`.
    pub fn validate(&self) -> Result<(), AmplifyError> {
        if self.factor == 0 {
            return Err(AmplifyError::InvalidArg("backoff factor must be >= 1".into()));
        }
        if self.jitter_percent > 100 {
            return Err(AmplifyError::InvalidArg(format!(
                "jitter_percent must be within [0, 100], got {}",
                self.jitter_percent
            )));
        }
        if self.min_backoff_ms > self.max_backoff_ms {
            return Err(AmplifyError::InvalidArg(format!(
                "min_backoff_ms ({}) exceeds max_backoff_ms ({})",
                self.min_backoff_ms, self.max_backoff_ms
            )));
        }
        Ok(())
    }
}

/// Paging parameters for follower collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Accounts requested per page.
    pub page_size: u32,
    /// Persist a checkpoint after this many pages; `0` disables checkpoints.
    pub checkpoint_every: u64,
    /// Length of a collection window following the analysed instant.
    pub window: Duration,
    /// Attempts allowed per page for retryable failures before giving up.
    pub max_retries: u32,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            page_size: 5000,
            checkpoint_every: 60,
            window: Duration::from_secs(14 * 86_400),
            max_retries: 8,
        }
    }
}

impl CollectionConfig {
    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `page_size` is zero or `window` is zero.
    pub fn validate(&self) -> Result<(), AmplifyError> {
        if self.page_size == 0 {
            return Err(AmplifyError::InvalidArg("page_size must be positive".into()));
        }
        if self.window.is_zero() {
            return Err(AmplifyError::InvalidArg("window must be positive".into()));
        }
        Ok(())
    }
}

/// Global configuration for the `Amplify` orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmplifyConfig {
    /// Paging parameters.
    pub collection: CollectionConfig,
    /// Retry delays for rate limits and transient source failures.
    pub backoff: BackoffConfig,
    /// Directory for JSON checkpoints; `None` keeps checkpoints in the
    /// caller-provided sink only.
    pub checkpoint_dir: Option<PathBuf>,
}

impl AmplifyConfig {
    /// Validate every section.
    ///
    /// # Errors
    /// Propagates the first section error.
    pub fn validate(&self) -> Result<(), AmplifyError> {
        self.collection.validate()?;
        self.backoff.validate()
    }
}
