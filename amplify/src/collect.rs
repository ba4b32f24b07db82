use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::watch;
use tokio::time::sleep;

use amplify_core::{CheckpointTag, FollowerPage, decode_with, encode};
use amplify_types::{AmplifyError, ChunkedListing, Collection, Cursor, StopReason};

use crate::backoff::Backoff;
use crate::core::Amplify;

/// What to page and where to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectRequest {
    /// Account handle whose followers are listed.
    pub account: String,
    /// First cursor requested.
    pub start: Cursor,
    /// Stop once a cursor decodes to this instant or earlier; `None` pages
    /// until the listing is exhausted.
    pub stop_after: Option<DateTime<Utc>>,
    /// Instant the run is anchored at, used to name checkpoints.
    pub anchor: DateTime<Utc>,
}

impl Amplify {
    /// Request for the followers `account` gained during the configured window
    /// after `after`.
    ///
    /// Paging starts at the cursor for `after + window` and stops once a
    /// cursor decodes to `after` or earlier.
    #[must_use]
    pub fn window_request(&self, account: &str, after: DateTime<Utc>) -> CollectRequest {
        let window = TimeDelta::from_std(self.cfg.collection.window).unwrap_or(TimeDelta::MAX);
        let until = after
            .checked_add_signed(window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        CollectRequest {
            account: account.to_string(),
            start: encode(until),
            stop_after: Some(after),
            anchor: after,
        }
    }

    /// Request for every follower of `account`, newest first.
    #[must_use]
    pub fn full_request(&self, account: &str) -> CollectRequest {
        let now = self.clock.now();
        CollectRequest {
            account: account.to_string(),
            start: encode(now),
            stop_after: None,
            anchor: now,
        }
    }

    /// Collect the followers `account` gained in the window after `after`.
    ///
    /// See [`collect`](Self::collect) for stop conditions.
    pub async fn collect_window(&self, account: &str, after: DateTime<Utc>) -> Collection {
        self.collect(&self.window_request(account, after), None).await
    }

    /// Collect every follower of `account`.
    pub async fn collect_all(&self, account: &str) -> Collection {
        self.collect(&self.full_request(account), None).await
    }

    /// Run several requests one after another.
    ///
    /// Once `cancel` flips to `true` the running request stops with
    /// `Cancelled` and the remaining ones are skipped.
    pub async fn collect_batch(
        &self,
        requests: &[CollectRequest],
        cancel: Option<watch::Receiver<bool>>,
    ) -> Vec<Collection> {
        let mut out = Vec::with_capacity(requests.len());
        for req in requests {
            if is_cancelled(cancel.as_ref()) {
                break;
            }
            out.push(self.collect(req, cancel.clone()).await);
        }
        out
    }

    /// Page through `req.account`'s followers, newest first.
    ///
    /// Behavior:
    /// - Each page is stored under the cursor it was requested with.
    /// - Paging stops when the current cursor decodes at or before
    ///   `req.stop_after`, when the source returns no next cursor or repeats
    ///   the current one, or when the account turns out to be protected or
    ///   deleted. The data gathered so far is always returned.
    /// - Rate limits and source failures are retried with exponential backoff
    ///   up to `max_retries` attempts per page; the backoff resets after every
    ///   successful page. Retried failures are kept as warnings.
    /// - When `cancel` flips to `true`, the in-flight request or backoff sleep
    ///   is abandoned and the run stops with `Cancelled`.
    /// - With a checkpoint sink configured, the listing is saved every
    ///   `checkpoint_every` pages and once more when the run stops. Save
    ///   failures are recorded as warnings and do not stop the run.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "amplify::collect::collect",
            skip(self, cancel),
            fields(account = %req.account, start = %req.start, source = self.source.name()),
        )
    )]
    pub async fn collect(
        &self,
        req: &CollectRequest,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> Collection {
        let every = self.cfg.collection.checkpoint_every;
        let mut listing = ChunkedListing::new();
        let mut warnings = Vec::new();
        let mut pages: u64 = 0;
        let mut cursor = req.start;

        let (stop, resume_cursor) = loop {
            if let Some(after) = req.stop_after
                && decode_with(cursor, &*self.clock) <= after
            {
                break (StopReason::WindowStart, None);
            }
            if is_cancelled(cancel.as_ref()) {
                break (StopReason::Cancelled, Some(cursor));
            }

            match self
                .fetch_page(&req.account, cursor, &mut warnings, &mut cancel)
                .await
            {
                Ok(page) => {
                    listing.insert(cursor, page.entries);
                    pages += 1;
                    if every > 0 && pages % every == 0 {
                        self.checkpoint(req, pages, false, &listing, &mut warnings)
                            .await;
                    }
                    match page.next_cursor {
                        Some(next) if next != cursor => cursor = next,
                        _ => break (StopReason::Exhausted, None),
                    }
                }
                Err(AmplifyError::NotAuthorized { .. }) => {
                    break (StopReason::NotAuthorized, None);
                }
                Err(AmplifyError::AccountDeleted { .. }) => {
                    break (StopReason::AccountDeleted, None);
                }
                Err(AmplifyError::Cancelled) => break (StopReason::Cancelled, Some(cursor)),
                Err(e) => break (StopReason::Failed(e), Some(cursor)),
            }
        };

        self.checkpoint(req, pages, true, &listing, &mut warnings)
            .await;

        #[cfg(feature = "tracing")]
        tracing::info!(
            pages,
            chunks = listing.len(),
            entries = listing.entry_count(),
            stop = ?stop,
            warnings = warnings.len(),
            "collection finished"
        );

        Collection {
            account: req.account.clone(),
            listing,
            pages,
            resume_cursor,
            stop,
            warnings,
        }
    }

    async fn fetch_page(
        &self,
        account: &str,
        cursor: Cursor,
        warnings: &mut Vec<AmplifyError>,
        cancel: &mut Option<watch::Receiver<bool>>,
    ) -> Result<FollowerPage, AmplifyError> {
        let page_size = self.cfg.collection.page_size;
        let max_attempts = self.cfg.collection.max_retries.max(1);
        let mut backoff = Backoff::new(self.cfg.backoff);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let res = tokio::select! {
                biased;
                () = wait_cancelled(cancel.as_mut()) => return Err(AmplifyError::Cancelled),
                res = self.source.follower_page(account, cursor, page_size) => res,
            };
            let err = match res {
                Ok(page) => return Ok(page),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    return Err(AmplifyError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => e,
            };

            let delay = backoff.next_delay(&err);
            #[cfg(feature = "tracing")]
            tracing::warn!(
                account,
                cursor = %cursor,
                attempt,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "page failed; backing off"
            );
            warnings.push(err);

            tokio::select! {
                biased;
                () = wait_cancelled(cancel.as_mut()) => return Err(AmplifyError::Cancelled),
                () = sleep(delay) => {}
            }
        }
    }

    async fn checkpoint(
        &self,
        req: &CollectRequest,
        pages: u64,
        last: bool,
        listing: &ChunkedListing,
        warnings: &mut Vec<AmplifyError>,
    ) {
        let Some(sink) = &self.checkpoints else {
            return;
        };
        let tag = CheckpointTag {
            account: &req.account,
            anchor: req.anchor,
            pages,
            last,
        };
        if let Err(e) = sink.save(tag, listing).await {
            #[cfg(feature = "tracing")]
            tracing::warn!(account = %req.account, pages, error = %e, "checkpoint failed");
            warnings.push(e);
        }
    }
}

fn is_cancelled(cancel: Option<&watch::Receiver<bool>>) -> bool {
    cancel.is_some_and(|rx| *rx.borrow())
}

// Resolves once the flag reads `true`; never resolves without a receiver or
// after the sender is dropped.
async fn wait_cancelled(cancel: Option<&mut watch::Receiver<bool>>) {
    if let Some(rx) = cancel
        && rx.wait_for(|stop| *stop).await.is_ok()
    {
        return;
    }
    std::future::pending::<()>().await;
}
