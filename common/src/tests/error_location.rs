// Unit tests for ErrorLocation capture and formatting

use crate::ErrorLocation;

use std::panic::Location;

#[track_caller]
fn capture_here() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

/// **VALUE**: Verifies that `#[track_caller]` helpers record the caller's position.
///
/// **WHY THIS MATTERS**: Every error variant in the workspace carries an ErrorLocation.
/// If it pointed at the helper instead of the call site, log lines would be useless.
///
/// **BUG THIS CATCHES**: Would catch if `from()` stopped using the supplied location.
#[test]
fn given_track_caller_helper_when_captured_then_points_at_caller() {
    // GIVEN / WHEN: Capturing through a #[track_caller] helper
    let expected_line = line!() + 1;
    let location = capture_here();

    // THEN: The location is this file and line
    assert!(location.file.ends_with("error_location.rs"));
    assert_eq!(location.line, expected_line);
}

/// **VALUE**: Verifies the bracketed `[file:line:column]` display format.
///
/// **BUG THIS CATCHES**: Would catch formatting changes that break log grepping.
#[test]
fn given_location_when_displayed_then_uses_bracket_format() {
    // GIVEN: A fixed location
    let location = ErrorLocation {
        file: "src/game.rs",
        line: 12,
        column: 5,
    };

    // WHEN / THEN
    assert_eq!(location.to_string(), "[src/game.rs:12:5]");
}
