use crate::sequential::helpers::{SCRIPTED_GAME_ID, ScriptedBackend, digit, wait_until};

use pi_core::error::PipelineError;
use pi_core::high_score::HighScoreStore;
use pi_core::sequential::{Phase, SequentialGame};

use models::StartGameRequest;

use std::sync::Arc;
use std::time::Duration;

async fn started(backend: Arc<ScriptedBackend>) -> SequentialGame<ScriptedBackend> {
    let game = SequentialGame::spawn(backend, None).expect("inside runtime");
    game.start(StartGameRequest::standard())
        .await
        .expect("scripted start succeeds");
    game
}

/// **VALUE**: A rapid burst of correct digits is confirmed in entry order.
///
/// **WHY THIS MATTERS**: This is the core gameplay loop. Digits typed faster than the
/// backend answers must still be verified one by one, in order.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Two verification calls overlap (max_in_flight > 1)
/// - The actor forgets to drain the queue after a confirmation
/// - Digits reach the backend out of order
#[tokio::test]
async fn given_burst_of_correct_digits_when_settled_then_all_confirmed_in_order() {
    // GIVEN: A slow backend and a started game
    let backend = Arc::new(ScriptedBackend::with_delay(Duration::from_millis(10)));
    let game = started(Arc::clone(&backend)).await;

    // WHEN: Submitting 1,4,1,5 without waiting
    for c in "1415".chars() {
        game.submit_digit(digit(c)).unwrap();
    }
    let snapshot = game.settled().await.unwrap();

    // THEN: All four confirmed, one call at a time, in order
    assert_eq!(snapshot.confirmed, "1415");
    assert_eq!(snapshot.score, 4);
    assert_eq!(snapshot.phase, Phase::Playing);
    assert!(snapshot.failure.is_none());
    assert_eq!(backend.calls(), "1415");
    assert_eq!(backend.max_in_flight(), 1);
}

/// **VALUE**: A second digit is not sent while the first is still being verified.
///
/// **WHY THIS MATTERS**: If '2' were verified before '1' resolved, the backend would check
/// it against the wrong position.
///
/// **BUG THIS CATCHES**: Would catch a drain that ignores the in-flight slot.
#[tokio::test]
async fn given_first_digit_in_flight_when_second_submitted_then_second_waits() {
    // GIVEN: A gated backend and a started game
    let backend = Arc::new(ScriptedBackend::gated());
    let game = started(Arc::clone(&backend)).await;

    // WHEN: Submitting '1' then '4' while '1' is held
    game.submit_digit(digit('1')).unwrap();
    game.submit_digit(digit('4')).unwrap();
    wait_until(|| backend.calls().len() == 1).await;
    let mut updates = game.subscribe();
    updates.wait_for(|s| s.pending == 1).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // THEN: Only '1' has reached the backend
    assert_eq!(backend.calls(), "1");
    assert_eq!(game.snapshot().in_flight, Some(digit('1')));

    // WHEN: Releasing both verdicts
    backend.release(2);
    let snapshot = game.settled().await.unwrap();

    // THEN: '4' followed '1'
    assert_eq!(backend.calls(), "14");
    assert_eq!(snapshot.confirmed, "14");
    assert_eq!(backend.max_in_flight(), 1);
}

/// **VALUE**: A wrong digit ends the run with the expected digit shown.
///
/// **BUG THIS CATCHES**: Would catch if the score moves after the failure or the
/// backend's expected digit is lost on the way to the display message.
#[tokio::test]
async fn given_correct_then_wrong_digit_when_settled_then_failed_with_expected_digit() {
    // GIVEN: A started game
    let backend = Arc::new(ScriptedBackend::default());
    let game = started(Arc::clone(&backend)).await;

    // WHEN: '1' (correct) then '9' (expected '4')
    game.submit_digit(digit('1')).unwrap();
    game.submit_digit(digit('9')).unwrap();
    let snapshot = game.settled().await.unwrap();

    // THEN
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.confirmed, "1");
    assert_eq!(snapshot.score, 1);
    assert_eq!(snapshot.message.as_deref(), Some("Wrong! Expected: 4"));
}

/// **VALUE**: Nothing is sent to the backend after the failure latch.
///
/// **WHY THIS MATTERS**: The failed session is over on the backend too; further calls
/// are wasted and could produce confusing verdicts.
///
/// **BUG THIS CATCHES**: Would catch if queued or new digits are drained after the latch.
#[tokio::test]
async fn given_failed_session_when_more_digits_submitted_then_no_calls_issued() {
    // GIVEN: A session that failed on its first digit, with digits queued behind it
    let backend = Arc::new(ScriptedBackend::with_delay(Duration::from_millis(10)));
    let game = started(Arc::clone(&backend)).await;
    for c in "7141".chars() {
        game.submit_digit(digit(c)).unwrap();
    }
    let failed = game.settled().await.unwrap();
    assert_eq!(failed.phase, Phase::Failed);
    assert_eq!(failed.pending, 0);

    // WHEN: Submitting more digits
    game.submit_digit(digit('5')).unwrap();
    game.submit_key("9").unwrap();
    let snapshot = game.settled().await.unwrap();

    // THEN: Only the first digit ever reached the backend
    assert_eq!(backend.calls(), "7");
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.pending, 0);
}

#[tokio::test]
async fn given_transport_failure_when_verifying_then_failed_with_generic_message() {
    let backend = Arc::new(ScriptedBackend::transport_error_at(1));
    let game = started(Arc::clone(&backend)).await;

    game.submit_digit(digit('1')).unwrap();
    game.submit_digit(digit('4')).unwrap();
    game.submit_digit(digit('1')).unwrap();
    let snapshot = game.settled().await.unwrap();

    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.confirmed, "1");
    assert_eq!(snapshot.message.as_deref(), Some("Error checking digit"));
    assert_eq!(backend.calls(), "14");
}

/// **VALUE**: Reset after failure clears everything and requires a new start.
///
/// **WHY THIS MATTERS**: Reset is the only recovery path. Digits typed between reset and
/// the next start must not be sent with a stale session id.
///
/// **BUG THIS CATCHES**: Would catch if reset leaves the session or the failure in place.
#[tokio::test]
async fn given_failed_session_when_reset_then_idle_until_started_again() {
    // GIVEN: A failed session
    let backend = Arc::new(ScriptedBackend::default());
    let game = started(Arc::clone(&backend)).await;
    game.submit_digit(digit('2')).unwrap();
    assert_eq!(game.settled().await.unwrap().phase, Phase::Failed);

    // WHEN: Resetting and typing before a new start
    game.reset().unwrap();
    game.submit_digit(digit('1')).unwrap();
    let snapshot = game.settled().await.unwrap();

    // THEN: Idle, empty, nothing sent
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.session.is_none());
    assert_eq!(snapshot.confirmed, "");
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.pending, 0);
    assert!(snapshot.message.is_none());
    assert_eq!(backend.calls(), "2");

    // WHEN: Starting again
    let session = game.start(StartGameRequest::standard()).await.unwrap();

    // THEN: Playing with a fresh session
    assert_eq!(session.game_id, SCRIPTED_GAME_ID);
    assert_eq!(game.settled().await.unwrap().phase, Phase::Playing);
}

/// **VALUE**: A verdict that arrives after a restart does not leak into the new session.
///
/// **BUG THIS CATCHES**: Would catch if the actor applies verdicts without checking
/// which session epoch issued them.
#[tokio::test]
async fn given_call_in_flight_when_game_restarted_then_late_verdict_discarded() {
    // GIVEN: '1' held in flight
    let backend = Arc::new(ScriptedBackend::gated());
    let game = started(Arc::clone(&backend)).await;
    game.submit_digit(digit('1')).unwrap();
    wait_until(|| backend.in_flight() == 1).await;

    // WHEN: Restarting, then letting the old verdict through
    game.start(StartGameRequest::custom(5).unwrap()).await.unwrap();
    backend.release(1);
    wait_until(|| backend.in_flight() == 0).await;
    let snapshot = game.settled().await.unwrap();

    // THEN: The new session has no confirmed digits
    assert_eq!(snapshot.phase, Phase::Playing);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.session.unwrap().start_position, 5);
}

/// **VALUE**: A reset issued while the start call is pending wins over that start.
///
/// **WHY THIS MATTERS**: Handles are shared. If one handle resets while another is
/// waiting for the backend, the game must not silently come back to life when the
/// start response arrives.
///
/// **BUG THIS CATCHES**: Would catch if `Begin` were applied without checking that no
/// reset happened since the start's own reset.
#[tokio::test]
async fn given_start_pending_when_reset_then_session_dropped_and_start_superseded() {
    // GIVEN: A start call held by the backend
    let backend = Arc::new(ScriptedBackend::start_gated());
    let game = SequentialGame::spawn(Arc::clone(&backend), None).unwrap();
    let starting = tokio::spawn({
        let game = game.clone();
        async move { game.start(StartGameRequest::standard()).await }
    });
    wait_until(|| backend.starts_waiting() == 1).await;

    // WHEN: Another handle resets, then the start response arrives
    game.clone().reset().unwrap();
    backend.release_start(1);
    let result = starting.await.unwrap();
    game.submit_digit(digit('1')).unwrap();
    let snapshot = game.settled().await.unwrap();

    // THEN: The start reports it was superseded and the game stays idle
    assert!(matches!(result, Err(PipelineError::Superseded { .. })));
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.session.is_none());
    assert_eq!(backend.calls(), "");

    // AND: A fresh start still works
    backend.release_start(1);
    game.start(StartGameRequest::standard()).await.unwrap();
    assert_eq!(game.snapshot().phase, Phase::Playing);
}

#[tokio::test]
async fn given_backend_refuses_start_when_starting_then_idle_with_message() {
    // GIVEN: A backend whose start call fails
    let backend = Arc::new(ScriptedBackend::failing_start());
    let game = SequentialGame::spawn(Arc::clone(&backend), None).unwrap();

    // WHEN: Starting, then typing
    let result = game.start(StartGameRequest::standard()).await;
    game.submit_digit(digit('1')).unwrap();
    let snapshot = game.settled().await.unwrap();

    // THEN: Start error returned, still idle, digit never sent
    assert!(matches!(result, Err(PipelineError::Start { .. })));
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(
        snapshot.message.as_deref(),
        Some("Failed to start game. Is the backend running?")
    );
    assert_eq!(backend.calls(), "");
}

#[tokio::test]
async fn given_non_digit_keys_when_submitted_then_ignored() {
    let backend = Arc::new(ScriptedBackend::default());
    let game = started(Arc::clone(&backend)).await;

    assert!(!game.submit_key("a").unwrap());
    assert!(!game.submit_key("Backspace").unwrap());
    assert!(!game.submit_key("14").unwrap());
    assert!(game.submit_key("1").unwrap());
    let snapshot = game.settled().await.unwrap();

    assert_eq!(backend.calls(), "1");
    assert_eq!(snapshot.confirmed, "1");
}

/// **VALUE**: Confirmations raise the stored high score, which never goes down.
///
/// **WHY THIS MATTERS**: The home screen shows the best run ever; a short second run
/// must not overwrite a long first one.
///
/// **BUG THIS CATCHES**: Would catch if the store overwrites instead of taking the max.
#[tokio::test]
async fn given_high_score_store_when_runs_played_then_best_score_kept() {
    // GIVEN: A game with a high score store in a temp dir
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path());
    let backend = Arc::new(ScriptedBackend::default());
    let game = SequentialGame::spawn(Arc::clone(&backend), Some(store.clone())).unwrap();

    // WHEN: A first run scores 4
    game.start(StartGameRequest::standard()).await.unwrap();
    for c in "1415".chars() {
        game.submit_digit(digit(c)).unwrap();
    }
    game.settled().await.unwrap();

    // THEN
    assert_eq!(store.load().unwrap(), 4);

    // WHEN: A second run fails immediately
    game.start(StartGameRequest::standard()).await.unwrap();
    game.submit_digit(digit('0')).unwrap();
    let snapshot = game.settled().await.unwrap();

    // THEN: Still 4
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(store.load().unwrap(), 4);
}

/// **VALUE**: Confirmations below the best known score never touch the high score file.
///
/// **WHY THIS MATTERS**: Every confirmed digit goes through the game actor. Reading and
/// rewriting the file for each one would stall the actor on disk I/O for no change.
///
/// **BUG THIS CATCHES**: Would catch if the actor stopped caching the best score and
/// called `record` on every confirmation (the corrupt file below would be rewritten).
#[tokio::test]
async fn given_stored_best_above_run_when_digits_confirmed_then_file_untouched() {
    // GIVEN: A stored best of 50, loaded by the actor
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path());
    store.record(50).unwrap();
    let backend = Arc::new(ScriptedBackend::default());
    let game = SequentialGame::spawn(Arc::clone(&backend), Some(store.clone())).unwrap();
    game.settled().await.unwrap();

    // AND: The file is replaced behind the actor's back
    std::fs::write(store.path(), "not json").unwrap();

    // WHEN: A short run is confirmed
    game.start(StartGameRequest::standard()).await.unwrap();
    for c in "141".chars() {
        game.submit_digit(digit(c)).unwrap();
    }
    let snapshot = game.settled().await.unwrap();

    // THEN: Score counted, file not rewritten
    assert_eq!(snapshot.score, 3);
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "not json");
}

#[test]
fn given_no_runtime_when_spawning_then_returns_runtime_error() {
    let backend = Arc::new(ScriptedBackend::default());

    let result = SequentialGame::spawn(backend, None);

    assert!(matches!(result, Err(PipelineError::Runtime { .. })));
}
