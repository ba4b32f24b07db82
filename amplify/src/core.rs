use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use amplify_core::{CheckpointSink, Clock, FollowerSource, SystemClock};
use amplify_types::{AmplifyConfig, AmplifyError, BackoffConfig};

use crate::checkpoint::JsonDirCheckpoint;

/// Orchestrator that pages follower listings from one source and turns them
/// into gain estimates.
pub struct Amplify {
    pub(crate) source: Arc<dyn FollowerSource>,
    pub(crate) checkpoints: Option<Arc<dyn CheckpointSink>>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) cfg: AmplifyConfig,
}

/// Builder for constructing an `Amplify` orchestrator with custom configuration.
pub struct AmplifyBuilder {
    source: Option<Arc<dyn FollowerSource>>,
    checkpoints: Option<Arc<dyn CheckpointSink>>,
    clock: Arc<dyn Clock>,
    cfg: AmplifyConfig,
}

impl Default for AmplifyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplifyBuilder {
    /// Create a new builder with the default configuration.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no source; you must register one via [`with_source`](Self::with_source).
    /// - Defaults mirror the upstream API limits: 5000 accounts per page, a
    ///   14-day collection window, checkpoints every 60 pages, and backoff from
    ///   one minute up to the 15-minute rate-limit window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            checkpoints: None,
            clock: Arc::new(SystemClock),
            cfg: AmplifyConfig::default(),
        }
    }

    /// Register the follower source. A later call replaces the earlier one.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn FollowerSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Persist checkpoints through `sink`.
    ///
    /// Takes precedence over [`checkpoint_dir`](Self::checkpoint_dir).
    #[must_use]
    pub fn with_checkpoints(mut self, sink: Arc<dyn CheckpointSink>) -> Self {
        self.checkpoints = Some(sink);
        self
    }

    /// Resolve "now" through `clock` instead of the wall clock.
    ///
    /// Affects the start of full collections, the `-1` cursor sentinel and the
    /// initial upper bound of newly seen accounts.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: AmplifyConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Accounts requested per page.
    #[must_use]
    pub const fn page_size(mut self, n: u32) -> Self {
        self.cfg.collection.page_size = n;
        self
    }

    /// Save a checkpoint every `pages` pages; `0` disables periodic saves.
    #[must_use]
    pub const fn checkpoint_every(mut self, pages: u64) -> Self {
        self.cfg.collection.checkpoint_every = pages;
        self
    }

    /// Length of the collection window after the analysed instant.
    #[must_use]
    pub const fn window(mut self, window: Duration) -> Self {
        self.cfg.collection.window = window;
        self
    }

    /// Attempts per page before a retryable failure ends the run.
    #[must_use]
    pub const fn max_retries(mut self, attempts: u32) -> Self {
        self.cfg.collection.max_retries = attempts;
        self
    }

    /// Retry delays for rate limits and transient source failures.
    ///
    /// Behavior and trade-offs:
    /// - Delays grow by `factor` from `min_backoff_ms` to `max_backoff_ms` and
    ///   reset after each successful page.
    /// - Higher jitter spreads out concurrent collectors sharing a quota but
    ///   adds variance to each run.
    #[must_use]
    pub const fn backoff(mut self, cfg: BackoffConfig) -> Self {
        self.cfg.backoff = cfg;
        self
    }

    /// Write JSON checkpoints under `dir`.
    #[must_use]
    pub fn checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.checkpoint_dir = Some(dir.into());
        self
    }

    /// Build the `Amplify` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no source has been registered or the
    /// configuration fails validation.
    pub fn build(self) -> Result<Amplify, AmplifyError> {
        self.cfg.validate()?;
        let Some(source) = self.source else {
            return Err(AmplifyError::InvalidArg(
                "no follower source registered; add one via with_source(...)".to_string(),
            ));
        };
        let checkpoints = self.checkpoints.or_else(|| {
            self.cfg
                .checkpoint_dir
                .clone()
                .map(|dir| Arc::new(JsonDirCheckpoint::new(dir)) as Arc<dyn CheckpointSink>)
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            source = source.name(),
            checkpoints = checkpoints.is_some(),
            page_size = self.cfg.collection.page_size,
            "built amplify orchestrator"
        );

        Ok(Amplify {
            source,
            checkpoints,
            clock: self.clock,
            cfg: self.cfg,
        })
    }
}

impl Amplify {
    /// Start building a new `Amplify` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// let amplify = amplify::Amplify::builder()
    ///     .with_source(Arc::new(MyApiSource::new(token)))
    ///     .checkpoint_dir("/var/lib/amplify")
    ///     .page_size(5000)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> AmplifyBuilder {
        AmplifyBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AmplifyConfig {
        &self.cfg
    }

    /// Name of the registered follower source.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }
}
