use amplify_core::{
    AccountId, AccountSet, AmplifyError, BrokerFollowTimes, Cursor, FALLBACK_FOLLOW_NUDGE,
    QueryWindow, RetweetCursors, TimeBound, TimeBounds, already_followed, interpolate_gains,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

const BROKER: &str = "broker";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn july_week() -> QueryWindow {
    QueryWindow::new(date(2023, 7, 1), date(2023, 7, 8)).unwrap()
}

fn retweets(reference: i64) -> RetweetCursors {
    [(AccountId::from(BROKER), vec![Cursor::new(reference), Cursor::new(1)])]
        .into_iter()
        .collect()
}

fn set(raw: &[u64]) -> AccountSet {
    raw.iter().copied().map(AccountId::from).collect()
}

#[test]
fn classification_and_even_split() {
    let window = july_week();
    let mut bounds = TimeBounds::new();
    // account 1: four days inside the window
    bounds.insert(
        AccountId::from(1u64),
        TimeBound { low: Some(at(2023, 7, 2)), high: at(2023, 7, 5) },
    );
    // account 2: open low, high past the window end
    bounds.insert(AccountId::from(2u64), TimeBound::open(at(2023, 9, 1)));

    let follows: BrokerFollowTimes = [(AccountId::from(1u64), Cursor::new(100))].into_iter().collect();
    let estimate = interpolate_gains(
        &set(&[1, 2]),
        &window,
        &bounds,
        &follows,
        &retweets(500),
        &AccountId::from(BROKER),
    )
    .unwrap();

    assert_eq!(estimate.already_following.len(), 7);
    assert_eq!(estimate.not_following.len(), 7);
    for d in 2..=5 {
        assert!((estimate.already_following.get(date(2023, 7, d)).unwrap() - 0.25).abs() < 1e-12);
    }
    assert_eq!(estimate.already_following.get(date(2023, 7, 1)), Some(0.0));
    assert_eq!(estimate.already_following.get(date(2023, 7, 6)), Some(0.0));

    // unknown follow time falls back to reference + nudge, so not following
    for d in 1..=7 {
        let v = estimate.not_following.get(date(2023, 7, d)).unwrap();
        assert!((v - 1.0 / 7.0).abs() < 1e-12);
    }
    assert!((estimate.total() - 2.0).abs() < 1e-9);
    assert!(estimate.unplaced.is_empty());
}

#[test]
fn follow_exactly_at_reference_counts_as_already_following() {
    assert!(already_followed(Some(Cursor::new(10)), Cursor::new(10)));
    assert!(!already_followed(Some(Cursor::new(11)), Cursor::new(10)));
    assert!(!already_followed(None, Cursor::new(10)));
    assert!(already_followed(
        Some(Cursor::new(10 + FALLBACK_FOLLOW_NUDGE)),
        Cursor::new(10 + FALLBACK_FOLLOW_NUDGE)
    ));
}

#[test]
fn bound_outside_window_is_unplaced() {
    let window = july_week();
    let mut bounds = TimeBounds::new();
    bounds.insert(
        AccountId::from(9u64),
        TimeBound { low: Some(at(2023, 6, 1)), high: at(2023, 6, 20) },
    );
    bounds.insert(
        AccountId::from(10u64),
        TimeBound { low: Some(at(2023, 7, 3)), high: at(2023, 7, 3) },
    );

    let estimate = interpolate_gains(
        &set(&[9, 10]),
        &window,
        &bounds,
        &BrokerFollowTimes::new(),
        &retweets(500),
        &AccountId::from(BROKER),
    )
    .unwrap();

    assert_eq!(estimate.unplaced, vec![AccountId::from(9u64)]);
    assert!((estimate.total() - 1.0).abs() < 1e-12);
    assert_eq!(estimate.not_following.get(date(2023, 7, 3)), Some(1.0));
}

#[test]
fn empty_window_places_nothing() {
    let window = QueryWindow::new(date(2023, 7, 1), date(2023, 7, 1)).unwrap();
    let mut bounds = TimeBounds::new();
    bounds.insert(AccountId::from(1u64), TimeBound::open(at(2023, 7, 1)));

    let estimate = interpolate_gains(
        &set(&[1]),
        &window,
        &bounds,
        &BrokerFollowTimes::new(),
        &retweets(0),
        &AccountId::from(BROKER),
    )
    .unwrap();

    assert!(estimate.already_following.is_empty());
    assert!(estimate.not_following.is_empty());
    assert_eq!(estimate.unplaced.len(), 1);
}

#[test]
fn missing_broker_reference_is_not_found() {
    let err = interpolate_gains(
        &set(&[1]),
        &july_week(),
        &TimeBounds::new(),
        &BrokerFollowTimes::new(),
        &RetweetCursors::new(),
        &AccountId::from(BROKER),
    )
    .unwrap_err();
    assert!(matches!(err, AmplifyError::NotFound { .. }));
}

#[test]
fn missing_bound_is_data_error() {
    let err = interpolate_gains(
        &set(&[42]),
        &july_week(),
        &TimeBounds::new(),
        &BrokerFollowTimes::new(),
        &retweets(1),
        &AccountId::from(BROKER),
    )
    .unwrap_err();
    assert!(matches!(err, AmplifyError::Data(_)));
}

fn arb_case() -> impl Strategy<Value = (Vec<(Option<i64>, i64, Option<i64>)>, i64)> {
    let account = (
        prop::option::of(-30i64..40),
        -30i64..60,
        prop::option::of(0i64..1_000),
    );
    (prop::collection::vec(account, 0..25), 0i64..1_000)
}

proptest! {
    #[test]
    fn credit_is_conserved_for_placed_accounts((accounts, reference) in arb_case()) {
        let window = QueryWindow::starting_at(date(2023, 3, 1), 30).unwrap();
        let origin = at(2023, 3, 1);
        let mut bounds = TimeBounds::new();
        let mut follows = BrokerFollowTimes::new();
        let mut accumulated = AccountSet::new();

        for (i, (low, high, followed)) in accounts.iter().enumerate() {
            let id = AccountId::from(i as u64);
            let bound = TimeBound {
                low: low.map(|d| origin + chrono::TimeDelta::days(d)),
                high: origin + chrono::TimeDelta::days(*high),
            };
            bounds.insert(id.clone(), bound);
            if let Some(f) = followed {
                follows.insert(id.clone(), Cursor::new(*f));
            }
            accumulated.insert(id);
        }

        let estimate = interpolate_gains(
            &accumulated,
            &window,
            &bounds,
            &follows,
            &retweets(reference),
            &AccountId::from(BROKER),
        )
        .unwrap();

        let placed = accumulated.len() - estimate.unplaced.len();
        prop_assert!((estimate.total() - placed as f64).abs() < 1e-6);

        // one entry per window day, all non-negative
        for series in [&estimate.already_following, &estimate.not_following] {
            prop_assert_eq!(series.len(), window.len_days());
            let days: Vec<_> = series.iter().map(|(d, _)| d).collect();
            prop_assert_eq!(days, window.days().collect::<Vec<_>>());
            prop_assert!(series.iter().all(|(_, v)| v >= 0.0));
        }
    }
}
