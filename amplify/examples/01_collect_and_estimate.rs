use std::sync::Arc;

use amplify::{Amplify, BrokerContext, BrokerFollowTimes, Cursor, QueryWindow, RetweetCursors};
use amplify_mock::TimelineSource;
use chrono::{NaiveDate, TimeZone, Utc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging: RUST_LOG=amplify=debug shows paging and estimator spans
    //    when built with `--features tracing`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. A deterministic source: three new followers a day through June and July.
    let first = NaiveDate::from_ymd_opt(2023, 6, 1).ok_or("bad date")?;
    let last = NaiveDate::from_ymd_opt(2023, 7, 31).ok_or("bad date")?;
    let source = Arc::new(TimelineSource::new().with_daily_followers("author", first, last, 3));

    // 3. Build the orchestrator.
    let amplify = Amplify::builder()
        .with_source(source)
        .page_size(20)
        .build()?;

    // 4. Collect the followers gained in the two weeks after the retweet.
    let retweeted_at = Utc.with_ymd_and_hms(2023, 7, 3, 0, 0, 0).single().ok_or("bad instant")?;
    let collection = amplify.collect_window("author", retweeted_at).await;
    println!(
        "collected {} pages, {} accounts, stop = {:?}",
        collection.pages,
        collection.listing.accounts().len(),
        collection.stop
    );

    // 5. Pretend the broker was followed by every third gained follower early on.
    let follows: BrokerFollowTimes = collection
        .listing
        .accounts()
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % 3 == 0)
        .map(|(_, id)| (id, Cursor::new(1)))
        .collect();
    let broker = amplify::AccountId::from("broker");
    let retweets: RetweetCursors = [(broker.clone(), vec![Cursor::new(100)])].into_iter().collect();

    // 6. Estimate daily gains for the window.
    let window = QueryWindow::starting_at(retweeted_at.date_naive(), 14)?;
    let analysis = amplify.analyze(
        [&collection.listing],
        &window,
        &BrokerContext {
            broker: &broker,
            follows: &follows,
            retweets: &retweets,
        },
    )?;
    println!("{:#}", analysis.daily_rows());
    println!(
        "already following: {:.2}, not following: {:.2}, unplaced: {}",
        analysis.estimate.already_following.total(),
        analysis.estimate.not_following.total(),
        analysis.estimate.unplaced.len()
    );

    Ok(())
}
