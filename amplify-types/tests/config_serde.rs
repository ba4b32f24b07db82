use amplify_types::{
    AmplifyConfig, AmplifyError, BackoffConfig, CollectionConfig, QueryWindow, TimeBound,
};
use chrono::{DateTime, NaiveDate, Utc};

#[test]
fn amplify_config_roundtrip() {
    let cfg = AmplifyConfig {
        collection: CollectionConfig {
            page_size: 200,
            checkpoint_every: 10,
            window: std::time::Duration::from_secs(7 * 86_400),
            max_retries: 3,
        },
        backoff: BackoffConfig {
            min_backoff_ms: 10,
            max_backoff_ms: 1_000,
            factor: 3,
            jitter_percent: 0,
        },
        checkpoint_dir: Some("/tmp/amplify".into()),
    };

    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: AmplifyConfig = serde_json::from_str(&json).expect("deserialize config");

    assert_eq!(de, cfg);
    assert_eq!(de.collection.window.as_secs(), 7 * 86_400);
}

#[test]
fn default_config_is_valid() {
    let cfg = AmplifyConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.collection.page_size, 5000);
    assert_eq!(cfg.collection.checkpoint_every, 60);
    assert_eq!(cfg.collection.window.as_secs(), 14 * 86_400);
}

#[test]
fn invalid_backoff_is_rejected() {
    let bad = BackoffConfig {
        factor: 0,
        ..BackoffConfig::default()
    };
    assert!(matches!(bad.validate(), Err(AmplifyError::InvalidArg(_))));

    let inverted = BackoffConfig {
        min_backoff_ms: 10,
        max_backoff_ms: 5,
        ..BackoffConfig::default()
    };
    assert!(matches!(inverted.validate(), Err(AmplifyError::InvalidArg(_))));
}

#[test]
fn zero_page_size_is_rejected() {
    let cfg = AmplifyConfig {
        collection: CollectionConfig {
            page_size: 0,
            ..CollectionConfig::default()
        },
        ..AmplifyConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(AmplifyError::InvalidArg(_))));
}

#[test]
fn error_roundtrip_and_classification() {
    let err = AmplifyError::RetriesExhausted {
        attempts: 4,
        last: Box::new(AmplifyError::rate_limited(Some(900_000))),
    };
    let json = serde_json::to_string(&err).expect("serialize error");
    let de: AmplifyError = serde_json::from_str(&json).expect("deserialize error");
    assert_eq!(de, err);

    assert!(AmplifyError::rate_limited(None).is_retryable());
    assert!(AmplifyError::source("mock", "boom").is_retryable());
    assert!(
        !AmplifyError::NotAuthorized {
            account: "x".into()
        }
        .is_retryable()
    );
    assert!(
        AmplifyError::AccountDeleted {
            account: "x".into()
        }
        .is_account_terminal()
    );
}

#[test]
fn window_rejects_inverted_range_and_counts_days() {
    let d = |m: u32, day: u32| NaiveDate::from_ymd_opt(2023, m, day).unwrap();
    assert!(QueryWindow::new(d(7, 5), d(7, 1)).is_err());

    let w = QueryWindow::new(d(7, 1), d(7, 15)).unwrap();
    assert_eq!(w.len_days(), 14);
    assert_eq!(w.last_day(), Some(d(7, 14)));
    assert_eq!(w.days().count(), 14);

    let empty = QueryWindow::new(d(7, 1), d(7, 1)).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.last_day(), None);
}

#[test]
fn time_bound_moves_monotonically() {
    let t = |s: i64| DateTime::<Utc>::from_timestamp(s, 0).unwrap();
    let mut b = TimeBound::open(t(1_000));

    b.tighten_high(t(2_000));
    assert_eq!(b.high, t(1_000));
    b.tighten_high(t(500));
    assert_eq!(b.high, t(500));

    b.raise_low(t(100));
    b.raise_low(t(50));
    assert_eq!(b.low, Some(t(100)));
    assert!(b.is_consistent());
}
