use pi_core::error::HighScoreError;
use pi_core::high_score::HighScoreStore;

use std::time::Duration;

#[test]
fn given_empty_dir_when_loading_then_returns_zero() {
    let dir = tempfile::tempdir().unwrap();

    let store = HighScoreStore::new(dir.path());

    assert_eq!(store.load().unwrap(), 0);
}

/// **VALUE**: Verifies the stored high score only ever goes up.
///
/// **WHY THIS MATTERS**: Every confirmation records the current score. A lower score
/// from a newer run must not replace the best one.
///
/// **BUG THIS CATCHES**: Would catch a plain overwrite in `record()`.
#[test]
fn given_higher_then_lower_scores_when_recorded_then_maximum_kept() {
    // GIVEN: A fresh store
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path());

    // WHEN: Recording 12, then 3, then 15
    let after_12 = store.record(12).unwrap();
    let after_3 = store.record(3).unwrap();
    let after_15 = store.record(15).unwrap();

    // THEN: Monotonic maximum
    assert_eq!(after_12, 12);
    assert_eq!(after_3, 12);
    assert_eq!(after_15, 15);
    assert_eq!(store.load().unwrap(), 15);
}

#[test]
fn given_store_file_when_read_then_uses_pi_high_score_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path());

    store.record(7).unwrap();

    let contents = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["piHighScore"], 7);
}

#[test]
fn given_corrupt_file_when_loading_then_parse_error_and_record_recovers() {
    // GIVEN: Garbage in the high score file
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path());
    std::fs::write(store.path(), "{not json").unwrap();

    // WHEN / THEN: load reports it
    assert!(matches!(store.load(), Err(HighScoreError::Parse { .. })));

    // WHEN / THEN: record overwrites it
    assert_eq!(store.record(2).unwrap(), 2);
    assert_eq!(store.load().unwrap(), 2);
}

/// **VALUE**: Verifies a watcher sees a score written through another handle.
///
/// **WHY THIS MATTERS**: Two terminals can be open at once; the idle one should show the
/// best score achieved in the other without a restart.
///
/// **BUG THIS CATCHES**: Would catch a watcher that only publishes its initial value.
#[tokio::test]
async fn given_watcher_when_other_handle_records_then_change_observed() {
    // GIVEN: A watcher on an empty store
    let dir = tempfile::tempdir().unwrap();
    let watched = HighScoreStore::new(dir.path());
    let mut scores = watched.watch(Duration::from_millis(20)).unwrap();
    assert_eq!(*scores.borrow(), 0);

    // WHEN: A second handle (another process) records a score
    HighScoreStore::new(dir.path()).record(31).unwrap();

    // THEN: The watcher publishes it
    let changed = tokio::time::timeout(Duration::from_secs(2), scores.changed()).await;
    assert!(changed.is_ok(), "Watcher should notice the new score");
    assert_eq!(*scores.borrow(), 31);
}
