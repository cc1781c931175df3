use pi_core::api::PiApiClient;
use pi_core::error::ApiError;

use models::{ChatRequest, Digit, QuizStartRequest, StartGameRequest};

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PiApiClient {
    PiApiClient::new(&format!("{}/api", server.uri())).expect("valid base url")
}

/// **VALUE**: Verifies the start call's path, body and decoded response.
///
/// **WHY THIS MATTERS**: Every sequential run begins here. A wrong path or body means
/// the player can never start a game.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The base URL without a trailing slash drops the `/api` segment on join
/// - The mode is serialized as a name instead of an integer
#[tokio::test]
async fn given_standard_request_when_starting_game_then_posts_mode_and_position() {
    // GIVEN: A backend expecting a standard start
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start"))
        .and(body_json(json!({"mode": 1, "start_position": 1})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"game_id": "g-42", "start_position": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Starting a game
    let response = client_for(&server)
        .start_game(&StartGameRequest::standard())
        .await
        .expect("start should succeed");

    // THEN: Session id and position are decoded
    assert_eq!(response.game_id, "g-42");
    assert_eq!(response.start_position, Some(1));
}

#[tokio::test]
async fn given_empty_game_id_when_starting_game_then_returns_missing_game_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"game_id": ""})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .start_game(&StartGameRequest::standard())
        .await;

    assert!(matches!(result, Err(ApiError::MissingGameId { .. })));
}

/// **VALUE**: Verifies the play call sends one digit as a string to the session path.
///
/// **BUG THIS CATCHES**: Would catch if the digit is sent as a number or the session id
/// is not interpolated into the path.
#[tokio::test]
async fn given_digit_when_playing_then_posts_input_to_session_path() {
    // GIVEN: A backend rejecting '9' at this position
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/game/g-42/play"))
        .and(body_json(json!({"input": "9"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"correct": false, "expected_digit": "4"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Playing '9'
    let response = client_for(&server)
        .play_digit("g-42", Digit::try_from('9').unwrap())
        .await
        .expect("play should succeed");

    // THEN: Verdict decoded
    assert!(!response.correct);
    assert_eq!(response.expected_digit.as_deref(), Some("4"));
}

/// **VALUE**: Verifies that session and quiz ids are sent as single escaped path segments.
///
/// **WHY THIS MATTERS**: Ids come from the backend and are opaque. A `?` would cut the
/// path short and a `/` with `..` could send a verification to a different route.
///
/// **BUG THIS CATCHES**: Would catch if ids were interpolated into a path string and
/// joined onto the base URL unescaped.
#[tokio::test]
async fn given_ids_with_reserved_characters_when_posting_then_escaped_in_path() {
    // GIVEN: A backend that only answers on the escaped paths
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/game/abc%3Fx/play"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"correct": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/game/..%2Fstart/play"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"correct": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/q%231%2F2/check"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"correct": true, "message": ""})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let one = Digit::try_from('1').unwrap();

    // WHEN: Posting with ids containing '?', '/', '..' and '#'
    let first = client.play_digit("abc?x", one).await;
    let second = client.play_digit("../start", one).await;
    let third = client.check_guess("q#1/2", one).await;

    // THEN: Each call reached its own escaped route
    assert!(first.expect("escaped id reaches play route").correct);
    assert!(second.expect("escaped id reaches play route").correct);
    assert!(third.expect("escaped id reaches check route").correct);

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert!(
        !paths.iter().any(|p| p == "/api/start/play" || p == "/api/game/abc"),
        "No request may escape its route: {paths:?}"
    );
}

#[tokio::test]
async fn given_dot_segment_id_when_playing_then_rejected_without_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let result = client.play_digit("..", Digit::try_from('1').unwrap()).await;

    assert!(matches!(result, Err(ApiError::InvalidPathSegment { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// **VALUE**: Verifies that non-2xx responses become Server errors carrying the status.
///
/// **WHY THIS MATTERS**: The pipeline treats any non-success response as a transport
/// failure. If a 500 body were parsed as a verdict, a server crash could look like a
/// wrong answer, or worse, a correct one.
#[tokio::test]
async fn given_server_error_when_playing_then_returns_server_error_with_status() {
    // GIVEN: A failing backend
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/game/g-1/play"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    // WHEN: Playing
    let result = client_for(&server)
        .play_digit("g-1", Digit::try_from('1').unwrap())
        .await;

    // THEN: Server error with status and body
    match result {
        Err(ApiError::Server {
            status, message, ..
        }) => {
            assert_eq!(status.0, 500);
            assert!(status.is_server_error());
            assert_eq!(message, "boom");
        }
        other => panic!("Expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_malformed_body_when_playing_then_returns_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/game/g-1/play"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .play_digit("g-1", Digit::try_from('1').unwrap())
        .await;

    assert!(matches!(result, Err(ApiError::Json { .. })));
}

#[tokio::test]
async fn given_unreachable_backend_when_starting_game_then_returns_http_error() {
    // GIVEN: A local port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let client = PiApiClient::new(&format!("http://127.0.0.1:{port}/api")).unwrap();

    // WHEN
    let result = client.start_game(&StartGameRequest::standard()).await;

    // THEN
    assert!(matches!(result, Err(ApiError::Http { .. })));
}

#[test]
fn given_invalid_base_url_when_creating_client_then_returns_url_parse_error() {
    let result = PiApiClient::new("not a url");

    assert!(matches!(result, Err(ApiError::UrlParse { .. })));
}

#[tokio::test]
async fn given_quiz_flow_when_started_and_checked_then_posts_expected_bodies() {
    // GIVEN: Quiz endpoints
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/start"))
        .and(body_json(json!({"position": null, "max_position": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "quiz_id": "q-7",
            "position": 42,
            "message": "What is the 42nd decimal?"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/quiz/q-7/check"))
        .and(body_json(json!({"guess": "9"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "correct": false,
            "expected_digit": "6",
            "message": "Nope, it was 6"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Starting a random quiz and guessing
    let quiz = client
        .start_quiz(&QuizStartRequest {
            position: None,
            max_position: 100,
        })
        .await
        .expect("quiz start");
    let verdict = client
        .check_guess(&quiz.quiz_id, Digit::try_from('9').unwrap())
        .await
        .expect("quiz check");

    // THEN
    assert_eq!(quiz.position, 42);
    assert!(!verdict.correct);
    assert_eq!(verdict.expected_digit.as_deref(), Some("6"));
    assert_eq!(verdict.message, "Nope, it was 6");
}

#[tokio::test]
async fn given_chat_message_when_sent_then_conversation_id_round_trips() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "Let's play!", "conversation_id": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Type the first digit after 3.",
            "conversation_id": "c-1"
        })))
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .chat(&ChatRequest {
            message: String::from("Let's play!"),
            conversation_id: None,
        })
        .await
        .expect("chat");

    assert_eq!(reply.conversation_id.as_deref(), Some("c-1"));
    assert_eq!(reply.message, "Type the first digit after 3.");
}
