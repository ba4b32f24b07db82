mod helpers;

use std::path::PathBuf;
use std::sync::Arc;

use amplify::{
    AccountEntry, AmplifyError, CheckpointSink, CheckpointTag, ChunkedListing, Cursor,
    JsonDirCheckpoint, StopReason,
};
use amplify_mock::TimelineSource;
use helpers::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("amplify-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn file_names_follow_the_run_anchor() {
    let anchor = dt(2023, 7, 4, 18, 30, 0);
    let periodic = CheckpointTag {
        account: "someone",
        anchor,
        pages: 120,
        last: false,
    };
    assert_eq!(
        JsonDirCheckpoint::file_name(&periodic),
        "120_someone_following_data_post_20230704.json"
    );

    let last = CheckpointTag {
        last: true,
        ..periodic
    };
    assert_eq!(
        JsonDirCheckpoint::file_name(&last),
        "someone_following_data_post_20230704_all.json"
    );

    let sneaky = CheckpointTag {
        account: "../etc",
        ..periodic
    };
    assert!(!JsonDirCheckpoint::file_name(&sneaky).contains('/'));
}

#[tokio::test]
async fn save_then_load_roundtrips_listing() {
    let dir = scratch_dir("roundtrip");
    let sink = JsonDirCheckpoint::new(&dir);

    let mut listing = ChunkedListing::new();
    listing.insert(Cursor::new(1_770_198_469_563_430_000), vec![AccountEntry::from(1u64)]);
    listing.insert(Cursor::NOW, vec![AccountEntry::from(2u64), AccountEntry::from(3u64)]);
    let tag = CheckpointTag {
        account: AUTHOR,
        anchor: dt(2023, 7, 1, 0, 0, 0),
        pages: 2,
        last: false,
    };

    sink.save(tag, &listing).await.unwrap();
    let back = JsonDirCheckpoint::load(sink.path_for(&tag)).await.unwrap();
    assert_eq!(back, listing);

    let missing = JsonDirCheckpoint::load(dir.join("nope.json")).await.unwrap_err();
    assert!(matches!(missing, AmplifyError::Checkpoint(_)));

    std::fs::write(dir.join("bad.json"), b"[1, 2]").unwrap();
    let bad = JsonDirCheckpoint::load(dir.join("bad.json")).await.unwrap_err();
    assert!(matches!(bad, AmplifyError::Data(_)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn checkpoint_dir_config_writes_final_file() {
    let dir = scratch_dir("collect");
    let source = Arc::new(
        TimelineSource::new().with_daily_followers(AUTHOR, day(2023, 6, 1), day(2023, 6, 10), 1),
    );
    let amplify = builder(source, dt(2023, 7, 1, 0, 0, 0))
        .page_size(3)
        .checkpoint_every(2)
        .checkpoint_dir(&dir)
        .build()
        .unwrap();

    let out = amplify.collect_all(AUTHOR).await;
    assert_eq!(out.stop, StopReason::Exhausted);
    assert_eq!(out.pages, 4);

    let final_path = dir.join(format!("{AUTHOR}_following_data_post_20230701_all.json"));
    assert_eq!(JsonDirCheckpoint::load(&final_path).await.unwrap(), out.listing);
    assert!(dir.join(format!("2_{AUTHOR}_following_data_post_20230701.json")).exists());
    assert!(dir.join(format!("4_{AUTHOR}_following_data_post_20230701.json")).exists());

    let _ = std::fs::remove_dir_all(&dir);
}
