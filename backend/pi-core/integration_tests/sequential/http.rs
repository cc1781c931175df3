// End-to-end: sequential game driven through the real HTTP client against wiremock

use pi_core::api::PiApiClient;
use pi_core::sequential::{Phase, SequentialGame};

use models::StartGameRequest;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_start(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/start"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"game_id": "http-game", "start_position": 1})),
        )
        .mount(server)
        .await;
}

async fn mount_verdict(server: &MockServer, input: &str, correct: bool, expected: Option<&str>) {
    Mock::given(method("POST"))
        .and(path("/api/game/http-game/play"))
        .and(body_json(json!({"input": input})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"correct": correct, "expected_digit": expected})),
        )
        .mount(server)
        .await;
}

/// **VALUE**: Verifies the whole pipeline over real HTTP: start, burst of digits, verdicts.
///
/// **WHY THIS MATTERS**: Unit tests cover the machine and scripted backends cover timing;
/// this proves `PiApiClient` satisfies the pipeline's backend contract on the wire.
#[tokio::test]
async fn given_http_backend_when_typing_1415_then_all_confirmed() {
    // GIVEN: A backend accepting 1, 4 and 5
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_verdict(&server, "1", true, None).await;
    mount_verdict(&server, "4", true, None).await;
    mount_verdict(&server, "5", true, None).await;

    let client = PiApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let game = SequentialGame::spawn(Arc::new(client), None).unwrap();

    // WHEN: Starting and typing quickly
    game.start(StartGameRequest::standard()).await.unwrap();
    for key in ["1", "4", "1", "5"] {
        game.submit_key(key).unwrap();
    }
    let snapshot = game.settled().await.unwrap();

    // THEN
    assert_eq!(snapshot.confirmed, "1415");
    assert_eq!(snapshot.score, 4);
    assert_eq!(snapshot.phase, Phase::Playing);

    let requests = server.received_requests().await.unwrap();
    let plays: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path().ends_with("/play"))
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["input"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(plays, vec!["1", "4", "1", "5"]);
}

#[tokio::test]
async fn given_http_backend_when_wrong_digit_then_expected_digit_shown() {
    // GIVEN: '1' accepted, '9' rejected with expected '4'
    let server = MockServer::start().await;
    mount_start(&server).await;
    mount_verdict(&server, "1", true, None).await;
    mount_verdict(&server, "9", false, Some("4")).await;

    let client = PiApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let game = SequentialGame::spawn(Arc::new(client), None).unwrap();

    // WHEN
    game.start(StartGameRequest::standard()).await.unwrap();
    game.submit_key("1").unwrap();
    game.submit_key("9").unwrap();
    let snapshot = game.settled().await.unwrap();

    // THEN
    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.score, 1);
    assert_eq!(snapshot.message.as_deref(), Some("Wrong! Expected: 4"));
}

#[tokio::test]
async fn given_http_backend_returning_500_when_verifying_then_generic_error() {
    let server = MockServer::start().await;
    mount_start(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/game/http-game/play"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = PiApiClient::new(&format!("{}/api", server.uri())).unwrap();
    let game = SequentialGame::spawn(Arc::new(client), None).unwrap();

    game.start(StartGameRequest::standard()).await.unwrap();
    game.submit_key("1").unwrap();
    let snapshot = game.settled().await.unwrap();

    assert_eq!(snapshot.phase, Phase::Failed);
    assert_eq!(snapshot.message.as_deref(), Some("Error checking digit"));
}
