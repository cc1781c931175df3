// Terminal sessions driven against a wiremock backend

use pi_buddy::command::{Command, parse};
use pi_buddy::terminal::Terminal;

use pi_core::config::AppConfig;
use pi_core::high_score::HighScoreStore;
use pi_core::sequential::Phase;

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.api_base_url = format!("{}/api/", server.uri());
    config.game.high_score_poll_ms = 100;
    config
}

async fn mount_start(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"game_id": "term-game", "start_position": 1})),
        )
        .mount(server)
        .await;
}

async fn mount_verdict(server: &MockServer, input: &str, correct: bool, expected: Option<&str>) {
    Mock::given(method("POST"))
        .and(path("/api/game/term-game/play"))
        .and(body_json(json!({"input": input})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"correct": correct, "expected_digit": expected})),
        )
        .mount(server)
        .await;
}

/// **VALUE**: Verifies a full run typed at the prompt: start, a burst of digits, score.
///
/// **WHY THIS MATTERS**: This is the main loop of the game. The terminal must wait for
/// the pipeline to settle before printing so the player sees every verdict.
///
/// **BUG THIS CATCHES**: Would catch if the terminal rendered before verification
/// finished, or dropped keystrokes from a multi-digit line.
#[tokio::test]
async fn given_backend_when_typing_digits_then_progress_is_shown() {
    // GIVEN
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_verdict(&server, "1", true, None).await;
    mount_verdict(&server, "4", true, None).await;
    mount_verdict(&server, "5", true, None).await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    // WHEN
    let started = terminal.handle(parse("start")).await;
    let typed = terminal.handle(parse("1415")).await;

    // THEN
    assert!(started.lines.iter().any(|l| l.contains("Run started")));
    assert_eq!(typed.lines[0], "(o_o) 3.1415?");
    assert_eq!(typed.lines[1], "Live progress: 4");
    assert!(!typed.quit);
}

/// **VALUE**: Verifies that a wrong digit prints the failure screen with the expected digit.
///
/// **BUG THIS CATCHES**: Would catch if the mismatch message were lost between the
/// pipeline and the view.
#[tokio::test]
async fn given_wrong_digit_when_typed_then_failure_screen_shown() {
    // GIVEN
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_verdict(&server, "1", true, None).await;
    mount_verdict(&server, "9", false, Some("4")).await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();
    terminal.handle(parse("start")).await;

    // WHEN
    let typed = terminal.handle(parse("19")).await;

    // THEN
    assert!(typed.lines.iter().any(|l| l.contains("SYSTEM ERROR!")));
    assert!(typed.lines.iter().any(|l| l == "Score: 1"));
    assert!(typed.lines.iter().any(|l| l == "Wrong! Expected: 4"));
    assert_eq!(terminal.snapshot().phase, Phase::Failed);

    // AND: reset goes back to Idle
    terminal.handle(Command::Reset).await;
    assert_eq!(terminal.snapshot().phase, Phase::Idle);
}

#[tokio::test]
async fn given_unreachable_backend_when_start_then_start_failure_message_shown() {
    // GIVEN: A backend that answers every start with 503
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    // WHEN
    let outcome = terminal.handle(parse("start")).await;

    // THEN
    assert!(
        outcome
            .lines
            .iter()
            .any(|l| l == "Failed to start game. Is the backend running?")
    );
    assert_eq!(terminal.snapshot().phase, Phase::Idle);
}

/// **VALUE**: Verifies that confirmed digits raise the persisted high score.
///
/// **WHY THIS MATTERS**: The high score survives restarts and is shared between sessions
/// through the data directory.
#[tokio::test]
async fn given_confirmed_digits_when_high_checked_then_best_score_updated() {
    // GIVEN
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_verdict(&server, "1", true, None).await;
    mount_verdict(&server, "4", true, None).await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();
    terminal.handle(parse("start")).await;

    // WHEN
    terminal.handle(parse("141")).await;

    // THEN: The file holds the new best score
    let store = HighScoreStore::new(data_dir.path());
    assert_eq!(store.load().unwrap(), 3);

    // AND: The watcher picks it up
    let mut seen = terminal.high_score();
    for _ in 0..40 {
        if seen == 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        seen = terminal.high_score();
    }
    assert_eq!(seen, 3);
    let high = terminal.handle(Command::High).await;
    assert_eq!(high.lines, vec![String::from("High score: 3")]);
}

#[tokio::test]
async fn given_quiz_when_guessed_wrong_then_expected_digit_shown_and_quiz_cleared() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/start"))
        .and(body_json(json!({"position": 3, "max_position": 100})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"quiz_id": "q-1", "position": 3, "message": ""})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/q-1/check"))
        .and(body_json(json!({"guess": "2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "correct": false,
            "expected_digit": "1",
            "message": ""
        })))
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    // WHEN
    let question = terminal.handle(parse("quiz at 3")).await;
    let answer = terminal.handle(parse("guess 2")).await;

    // THEN
    assert!(question.lines.iter().any(|l| l.contains("3rd decimal")));
    assert_eq!(answer.lines[0], "WRONG!");
    assert!(answer.lines.iter().any(|l| l == "The 3rd decimal of pi is 1."));
    assert!(terminal.active_quiz().is_none());
}

#[tokio::test]
async fn given_no_quiz_when_guess_then_hint_shown_without_request() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    let outcome = terminal.handle(parse("guess 4")).await;

    assert!(outcome.lines[0].starts_with("No quiz running"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// **VALUE**: Verifies that the conversation id from the first reply is sent back.
///
/// **BUG THIS CATCHES**: Would catch if every chat message opened a new conversation.
#[tokio::test]
async fn given_chat_reply_when_chatting_again_then_conversation_id_reused() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "hello", "conversation_id": null})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Hi! Ready for pi?", "conversation_id": "c-7"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "yes", "conversation_id": "c-7"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "3.14159...", "conversation_id": "c-7"})),
        )
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    // WHEN
    let first = terminal.handle(parse("hello")).await;
    let second = terminal.handle(parse("yes")).await;

    // THEN
    assert_eq!(first.lines, vec![String::from("Pi Buddy: Hi! Ready for pi?")]);
    assert_eq!(second.lines, vec![String::from("Pi Buddy: 3.14159...")]);
    assert_eq!(terminal.conversation_id(), Some("c-7"));
}

#[tokio::test]
async fn given_chat_backend_error_when_chatting_then_friendly_message_shown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    let outcome = terminal.handle(parse("chat hi")).await;

    assert_eq!(
        outcome.lines,
        vec![String::from("Oops! Failed to connect to AI. Please try again!")]
    );
}

#[tokio::test]
async fn given_quit_when_handled_then_outcome_requests_exit() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    let outcome = terminal.handle(parse("exit")).await;

    assert!(outcome.quit);
}

#[tokio::test]
async fn given_pi_lookup_when_handled_then_answered_locally() {
    let server = MockServer::start().await;
    let data_dir = TempDir::new().unwrap();
    let mut terminal = Terminal::new(config_for(&server), data_dir.path()).unwrap();

    let outcome = terminal.handle(parse("pi 5")).await;

    assert_eq!(outcome.lines, vec![String::from("The 5th decimal of pi is: 9")]);
    assert!(server.received_requests().await.unwrap().is_empty());
}
