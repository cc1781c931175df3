use crate::{
    GameMode, ModelError, PlayResponse, StartGameRequest, StartGameRequestBuilder,
    StartGameResponse,
};

use serde_json::json;

/// **VALUE**: Verifies the exact start-request body sent to the backend.
///
/// **WHY THIS MATTERS**: The backend distinguishes modes by integer (1 = standard,
/// 2 = custom). Sending the enum name would start every game in the wrong mode or fail.
///
/// **BUG THIS CATCHES**: Would catch if GameMode serialization falls back to variant names.
#[test]
fn given_standard_request_when_serialized_then_matches_wire_format() {
    // GIVEN: A standard start request
    let request = StartGameRequest::standard();

    // WHEN: Serializing
    let value = serde_json::to_value(&request).unwrap();

    // THEN: Mode 1, position 1
    assert_eq!(value, json!({"mode": 1, "start_position": 1}));
}

#[test]
fn given_custom_request_when_serialized_then_uses_mode_two() {
    let request = StartGameRequest::custom(250).unwrap();

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value, json!({"mode": 2, "start_position": 250}));
}

/// **VALUE**: Verifies that custom mode rejects position zero.
///
/// **WHY THIS MATTERS**: Positions are 1-based decimals after "3.". Position 0 would
/// ask the backend for the integer part, which the game never verifies.
///
/// **BUG THIS CATCHES**: Would catch if the lower-bound validation is removed.
#[test]
fn given_zero_position_when_building_custom_request_then_returns_validation_error() {
    // GIVEN / WHEN: Custom request at position 0
    let result = StartGameRequest::custom(0);

    // THEN: Validation error
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert!(message.contains("at least 1"));
        }
        Ok(request) => panic!("Position 0 accepted: {request:?}"),
    }
}

#[test]
fn given_custom_mode_without_position_when_building_then_returns_validation_error() {
    let result = StartGameRequestBuilder::default()
        .with_mode(GameMode::Custom)
        .build();

    assert!(result.is_err(), "Custom mode needs a position");
}

#[test]
fn given_standard_mode_with_other_position_when_building_then_returns_validation_error() {
    let result = StartGameRequestBuilder::default()
        .with_mode(GameMode::Standard)
        .with_start_position(5)
        .build();

    assert!(result.is_err(), "Standard mode is pinned to position 1");
}

#[test]
fn given_unknown_mode_number_when_deserialized_then_fails() {
    let result: Result<GameMode, _> = serde_json::from_value(json!(3));
    assert!(result.is_err());
}

#[test]
fn given_response_without_start_position_when_deserialized_then_defaults_to_none() {
    let response: StartGameResponse =
        serde_json::from_value(json!({"game_id": "abc"})).unwrap();

    assert_eq!(response.game_id, "abc");
    assert_eq!(response.start_position, None);
}

#[test]
fn given_correct_play_response_when_deserialized_then_expected_digit_absent() {
    let response: PlayResponse = serde_json::from_value(json!({"correct": true})).unwrap();

    assert!(response.correct);
    assert_eq!(response.expected_digit, None);
}

/// **VALUE**: Verifies that validated constructors are the only way to read a request.
///
/// **WHY THIS MATTERS**: The pipeline trusts the request's position. With public fields
/// a caller could write `mode: Custom, start_position: 0` and skip validation.
///
/// **BUG THIS CATCHES**: Would catch if the getters disagree with what the constructors
/// stored, or if the default request stops being a standard run.
#[test]
fn given_constructed_requests_when_read_then_getters_return_validated_values() {
    // GIVEN: Requests from each constructor
    let custom = StartGameRequest::custom(7).unwrap();
    let standard = StartGameRequest::default();

    // WHEN/THEN: Getters expose the validated values
    assert_eq!(custom.mode(), GameMode::Custom);
    assert_eq!(custom.start_position(), 7);
    assert_eq!(standard.mode(), GameMode::Standard);
    assert_eq!(standard.start_position(), 1);
}
