//! Daily estimate series and the query window they cover.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::error::AmplifyError;

/// Half-open day range `[start, end)` an estimate is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl QueryWindow {
    /// Build a window from its first day and its exclusive end day.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `end` precedes `start`. An equal pair is an
    /// empty window.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AmplifyError> {
        if end < start {
            return Err(AmplifyError::InvalidArg(format!(
                "window end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a window from instants; only their UTC calendar days are kept.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `end` falls on a day before `start`.
    pub fn from_instants(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AmplifyError> {
        Self::new(start.date_naive(), end.date_naive())
    }

    /// Window of `days` days beginning at `start`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the end day is not representable.
    pub fn starting_at(start: NaiveDate, days: u32) -> Result<Self, AmplifyError> {
        let end = start
            .checked_add_signed(TimeDelta::days(i64::from(days)))
            .ok_or_else(|| AmplifyError::InvalidArg(format!("{days} days after {start}")))?;
        Self::new(start, end)
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end day.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Last day inside the window, or `None` if the window is empty.
    #[must_use]
    pub fn last_day(&self) -> Option<NaiveDate> {
        if self.is_empty() {
            None
        } else {
            self.end.pred_opt()
        }
    }

    /// Number of days in the window.
    #[must_use]
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).unwrap_or(0)
    }

    /// Returns true if the window covers no day.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Iterate every day of the window in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

/// Estimated follow counts per calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailySeries {
    days: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    /// A series with a zero entry for every day of `window`.
    #[must_use]
    pub fn zeroed(window: &QueryWindow) -> Self {
        Self {
            days: window.days().map(|d| (d, 0.0)).collect(),
        }
    }

    /// Add `amount` to `day`, creating the entry if needed.
    pub fn add(&mut self, day: NaiveDate, amount: f64) {
        *self.days.entry(day).or_insert(0.0) += amount;
    }

    /// Value recorded for `day`.
    #[must_use]
    pub fn get(&self, day: NaiveDate) -> Option<f64> {
        self.days.get(&day).copied()
    }

    /// Sum over all days.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.days.values().sum()
    }

    /// Number of day entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns true if the series has no day entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate `(day, value)` pairs in day order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.days.iter().map(|(d, v)| (*d, *v))
    }
}

/// Output of the interpolation engine for one query window and broker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GainEstimate {
    /// Gained followers that already followed the broker.
    pub already_following: DailySeries,
    /// Gained followers not known to follow the broker.
    pub not_following: DailySeries,
    /// Accounts whose bound does not intersect the window; they carry no credit.
    pub unplaced: Vec<AccountId>,
}

impl GainEstimate {
    /// Zeroed series for `window` and no unplaced accounts.
    #[must_use]
    pub fn zeroed(window: &QueryWindow) -> Self {
        Self {
            already_following: DailySeries::zeroed(window),
            not_following: DailySeries::zeroed(window),
            unplaced: Vec::new(),
        }
    }

    /// Sum of both series over the whole window.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.already_following.total() + self.not_following.total()
    }
}
