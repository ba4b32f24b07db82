use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use amplify_core::cursor::{CURSOR_DAY_SCALE, CURSOR_OFFSET};
use amplify_core::{
    AccountEntry, AccountId, AmplifyError, Clock, Cursor, FollowerPage, FollowerSource,
    SystemClock, decode_with, encode,
};

/// Deterministic follower source backed by known follow days.
///
/// A page requested at cursor `c` holds the newest followers who followed
/// strictly before the calendar day of `decode(c)`, up to `page_size`
/// entries. Pages keep whole days where they can: a day whose followers do
/// not fit is left for the next page, unless it is the only day on the page.
///
/// The next cursor encodes the oldest day returned. When that day was cut
/// short, the next cursor sits `n` units below the following day's cursor,
/// where `n` counts the day's followers already served; paging resumes with
/// the rest of that day.
///
/// The handles `"PROTECTED"` and `"GONE"` answer with `NotAuthorized` and
/// `AccountDeleted`.
pub struct TimelineSource<C = SystemClock> {
    // Per account, newest first.
    timelines: HashMap<String, Vec<(NaiveDate, AccountId)>>,
    clock: C,
}

impl Default for TimelineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineSource {
    /// Empty source using the wall clock for the "now" cursor.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> TimelineSource<C> {
    /// Empty source resolving the "now" cursor with `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            timelines: HashMap::new(),
            clock,
        }
    }

    /// Record that `follower` started following `account` on `day`.
    #[must_use]
    pub fn with_follow(
        mut self,
        account: &str,
        follower: impl Into<AccountId>,
        day: NaiveDate,
    ) -> Self {
        let timeline = self.timelines.entry(account.to_string()).or_default();
        timeline.push((day, follower.into()));
        timeline.sort_by(|a, b| b.0.cmp(&a.0));
        self
    }

    /// Record `per_day` new followers of `account` for each day from `first`
    /// to `last` inclusive. Follower ids are `account`-prefixed and unique.
    #[must_use]
    pub fn with_daily_followers(
        mut self,
        account: &str,
        first: NaiveDate,
        last: NaiveDate,
        per_day: u32,
    ) -> Self {
        for (d, day) in first.iter_days().take_while(|d| *d <= last).enumerate() {
            for n in 0..per_day {
                let id = AccountId::new(format!("{account}-{d}-{n}"));
                self = self.with_follow(account, id, day);
            }
        }
        self
    }
}

#[async_trait]
impl<C: Clock> FollowerSource for TimelineSource<C> {
    fn name(&self) -> &'static str {
        "amplify-mock-timeline"
    }

    async fn follower_page(
        &self,
        account: &str,
        cursor: Cursor,
        page_size: u32,
    ) -> Result<FollowerPage, AmplifyError> {
        match account {
            "PROTECTED" => {
                return Err(AmplifyError::NotAuthorized {
                    account: account.to_string(),
                });
            }
            "GONE" => {
                return Err(AmplifyError::AccountDeleted {
                    account: account.to_string(),
                });
            }
            _ => {}
        }
        let timeline = self
            .timelines
            .get(account)
            .ok_or_else(|| AmplifyError::not_found(format!("followers of {account}")))?;

        let before = decode_with(cursor, &self.clock).date_naive();
        let limit = usize::try_from(page_size).unwrap_or(usize::MAX);
        let mut older: Vec<_> = timeline.iter().filter(|(day, _)| *day < before).collect();

        // Followers of the day before `before` already handed out.
        let served = served_of(cursor);
        let mut skipped = 0;
        if served > 0 {
            if let Some(cut_day) = before.pred_opt() {
                let skip = older
                    .iter()
                    .take(served)
                    .take_while(|(day, _)| *day == cut_day)
                    .count();
                older.drain(..skip);
                skipped = skip;
            }
        }

        let mut taken = older.len().min(limit);
        if taken < older.len() && taken > 0 {
            let boundary = older[taken].0;
            let whole_days = older[..taken]
                .iter()
                .take_while(|(day, _)| *day > boundary)
                .count();
            if whole_days > 0 {
                taken = whole_days;
            }
        }
        let page = &older[..taken];

        let next_cursor = match page.last() {
            Some((oldest, _)) if taken < older.len() => {
                if older[taken].0 == *oldest {
                    let resumed = if before.pred_opt() == Some(*oldest) {
                        skipped
                    } else {
                        0
                    };
                    Some(split_day_cursor(*oldest, resumed + taken))
                } else {
                    Some(encode(oldest.and_time(NaiveTime::MIN).and_utc()))
                }
            }
            _ => None,
        };
        Ok(FollowerPage {
            entries: page.iter().map(|(_, id)| AccountEntry::Id(id.clone())).collect(),
            next_cursor,
        })
    }
}

/// Cursor resuming `day` after its newest `served` followers.
fn split_day_cursor(day: NaiveDate, served: usize) -> Cursor {
    let next_day = day.succ_opt().unwrap_or(day);
    let base = encode(next_day.and_time(NaiveTime::MIN).and_utc());
    let served = i64::try_from(served).unwrap_or(i64::MAX);
    Cursor::new(base.get().saturating_sub(served))
}

/// Number of same-day followers a cursor from [`split_day_cursor`] skips;
/// zero for day cursors and sentinels.
fn served_of(cursor: Cursor) -> usize {
    let raw = match cursor.get() {
        -1 | 0 => return 0,
        c if c < -2 => i128::from(c).abs(),
        c => i128::from(c),
    };
    let scale = i128::from(CURSOR_DAY_SCALE);
    let rem = (raw - i128::from(CURSOR_OFFSET)).rem_euclid(scale);
    if rem == 0 {
        0
    } else {
        usize::try_from(scale - rem).unwrap_or(usize::MAX)
    }
}
