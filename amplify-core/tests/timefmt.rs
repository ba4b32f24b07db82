use amplify_core::{day_range, reformat, stamp, truncate_to_day};
use chrono::{NaiveDate, TimeZone, Utc};

#[test]
fn reformat_strips_separators() {
    assert_eq!(reformat("2023-07-04"), "20230704");
    assert_eq!(reformat("1999-12-31"), "19991231");
}

#[test]
fn reformat_is_positional_and_never_panics() {
    assert_eq!(reformat(""), "");
    assert_eq!(reformat("20"), "20");
    assert_eq!(reformat("2023-07-0"), "2023070");
    // trailing content past the day is ignored
    assert_eq!(reformat("2023-07-04T10:00"), "20230704");
    // no validation
    assert_eq!(reformat("abcd/ef/gh"), "abcdefgh");
}

#[test]
fn stamp_uses_utc_calendar_day() {
    let ts = Utc.with_ymd_and_hms(2021, 2, 3, 23, 59, 59).unwrap();
    assert_eq!(stamp(ts), "20210203");
}

#[test]
fn truncation_drops_time_of_day() {
    let ts = Utc.with_ymd_and_hms(2021, 2, 3, 17, 4, 5).unwrap();
    assert_eq!(truncate_to_day(ts), Utc.with_ymd_and_hms(2021, 2, 3, 0, 0, 0).unwrap());
    assert_eq!(truncate_to_day(truncate_to_day(ts)), truncate_to_day(ts));
}

#[test]
fn day_range_is_inclusive() {
    let d = |day| NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
    let days: Vec<_> = day_range(d(27), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).collect();
    assert_eq!(days.len(), 4);
    assert_eq!(days[2], d(29));
    assert_eq!(day_range(d(5), d(5)).count(), 1);
    assert_eq!(day_range(d(6), d(5)).count(), 0);
}
