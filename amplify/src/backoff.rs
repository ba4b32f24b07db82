use std::time::Duration;

use amplify_types::{AmplifyError, BackoffConfig};
use rand::Rng;

/// Exponential backoff state for retrying one page.
///
/// Each delay is the current base plus up to `jitter_percent` of random
/// jitter; the base then grows by `factor` up to `max_backoff_ms`. A
/// rate-limit error carrying a server hint waits at least that long.
#[derive(Debug, Clone)]
pub struct Backoff {
    cfg: BackoffConfig,
    base_ms: u64,
}

impl Backoff {
    /// Start at `cfg.min_backoff_ms`.
    #[must_use]
    pub const fn new(cfg: BackoffConfig) -> Self {
        Self {
            cfg,
            base_ms: cfg.min_backoff_ms,
        }
    }

    /// Base delay the next call to [`next_delay`](Self::next_delay) starts from.
    #[must_use]
    pub const fn current_base_ms(&self) -> u64 {
        self.base_ms
    }

    /// Delay to wait after `err`, advancing the base for the following failure.
    pub fn next_delay(&mut self, err: &AmplifyError) -> Duration {
        let base_ms = self.base_ms;
        let mut wait_ms = jitter_wait(base_ms, u32::from(self.cfg.jitter_percent.min(100)));
        if let AmplifyError::RateLimited {
            retry_after_ms: Some(hint),
        } = err
        {
            wait_ms = wait_ms.max(*hint);
        }
        self.base_ms = std::cmp::min(
            self.cfg.max_backoff_ms,
            base_ms.saturating_mul(u64::from(self.cfg.factor.max(1))),
        );
        Duration::from_millis(wait_ms)
    }

    /// Return to the minimum delay after a success.
    pub const fn reset(&mut self) {
        self.base_ms = self.cfg.min_backoff_ms;
    }
}

pub(crate) fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, (base_ms.saturating_mul(u64::from(jitter_percent))) / 100)
    };
    let mut rng = rand::rng();
    base_ms.saturating_add(rng.random_range(0..jitter_range))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(jitter_percent: u8) -> BackoffConfig {
        BackoffConfig {
            min_backoff_ms: 100,
            max_backoff_ms: 1_000,
            factor: 3,
            jitter_percent,
        }
    }

    #[test]
    fn grows_by_factor_and_caps() {
        let mut b = Backoff::new(cfg(0));
        let err = AmplifyError::source("s", "x");
        let waits: Vec<u128> = (0..5).map(|_| b.next_delay(&err).as_millis()).collect();
        assert_eq!(waits, vec![100, 300, 900, 1_000, 1_000]);
        b.reset();
        assert_eq!(b.current_base_ms(), 100);
    }

    #[test]
    fn jitter_stays_within_percent() {
        for _ in 0..200 {
            let w = jitter_wait(1_000, 20);
            assert!((1_000..1_200).contains(&w));
        }
        assert_eq!(jitter_wait(0, 50), 0);
    }

    #[test]
    fn rate_limit_hint_is_a_floor() {
        let mut b = Backoff::new(cfg(0));
        let d = b.next_delay(&AmplifyError::rate_limited(Some(5_000)));
        assert_eq!(d.as_millis(), 5_000);
        let d = b.next_delay(&AmplifyError::rate_limited(Some(10)));
        assert_eq!(d.as_millis(), 300);
    }
}
