// Unit tests for input line parsing

use crate::command::{Command, PI_USAGE, parse};

/// **VALUE**: Verifies that a line of digits becomes one burst of keystrokes.
///
/// **WHY THIS MATTERS**: Players type "14159" in one go; each character must reach the
/// pipeline in the order typed, including stray non-digits which the game ignores.
///
/// **BUG THIS CATCHES**: Would catch if digit lines were routed to chat or split into words.
#[test]
fn given_line_starting_with_digit_when_parsed_then_returns_keys() {
    // GIVEN/WHEN
    let command = parse("  1415 92  ");

    // THEN
    assert_eq!(command, Command::Keys(String::from("1415 92")));
}

#[test]
fn given_start_with_position_when_parsed_then_carries_position() {
    assert_eq!(parse("start"), Command::Start { position: None });
    assert_eq!(
        parse("START 42"),
        Command::Start { position: Some(42) }
    );
}

/// **VALUE**: Verifies that bad start positions never reach the backend.
///
/// **BUG THIS CATCHES**: Would catch if position 0 or negative text were accepted.
#[test]
fn given_invalid_start_position_when_parsed_then_returns_usage() {
    // GIVEN/WHEN
    let zero = parse("start 0");
    let text = parse("start soon");

    // THEN
    assert!(matches!(zero, Command::Invalid(_)));
    assert!(matches!(text, Command::Invalid(_)));
}

#[test]
fn given_command_aliases_when_parsed_then_map_to_same_command() {
    assert_eq!(parse("reset"), Command::Reset);
    assert_eq!(parse("reboot"), Command::Reset);
    assert_eq!(parse("high"), Command::High);
    assert_eq!(parse("highscore"), Command::High);
    assert_eq!(parse("quit"), Command::Quit);
    assert_eq!(parse("exit"), Command::Quit);
}

#[test]
fn given_quiz_variants_when_parsed_then_fill_position_or_max() {
    assert_eq!(
        parse("quiz"),
        Command::Quiz {
            position: None,
            max_position: None
        }
    );
    assert_eq!(
        parse("quiz 50"),
        Command::Quiz {
            position: None,
            max_position: Some(50)
        }
    );
    assert_eq!(
        parse("quiz at 7"),
        Command::Quiz {
            position: Some(7),
            max_position: None
        }
    );
    assert!(matches!(parse("quiz at"), Command::Invalid(_)));
    assert!(matches!(parse("quiz 1 2"), Command::Invalid(_)));
}

#[test]
fn given_guess_without_argument_when_parsed_then_returns_usage() {
    assert!(matches!(parse("guess"), Command::Invalid(_)));
    assert_eq!(parse("guess 5"), Command::Guess(String::from("5")));
}

/// **VALUE**: Verifies that free text falls through to chat.
///
/// **WHY THIS MATTERS**: Anything that isn't a command is a message for Pi Buddy.
///
/// **BUG THIS CATCHES**: Would catch if unknown words were rejected as invalid commands.
#[test]
fn given_unknown_text_when_parsed_then_returns_chat() {
    // GIVEN/WHEN
    let command = parse("what comes after 3.14?");

    // THEN
    assert_eq!(command, Command::Chat(String::from("what comes after 3.14?")));
    assert_eq!(parse("chat hi"), Command::Chat(String::from("hi")));
}

#[test]
fn given_blank_line_when_parsed_then_returns_empty() {
    assert_eq!(parse(""), Command::Empty);
    assert_eq!(parse("   \t"), Command::Empty);
}

/// **VALUE**: Verifies the local `pi <n>` lookup command and its argument checks.
///
/// **WHY THIS MATTERS**: `pi 10` is answered from the bundled table. Without the
/// command it would be sent to the chat backend as free text.
///
/// **BUG THIS CATCHES**: Would catch if position 0, negative numbers or words were
/// accepted as a decimal position.
#[test]
fn given_pi_lookup_when_parsed_then_returns_position_or_usage() {
    // GIVEN/WHEN/THEN: Valid positions
    assert_eq!(parse("pi 1"), Command::Pi(1));
    assert_eq!(parse("PI 1000"), Command::Pi(1000));

    // GIVEN/WHEN/THEN: Invalid positions carry the usage hint
    let usage = Command::Invalid(String::from(PI_USAGE));
    assert_eq!(parse("pi 0"), usage);
    assert_eq!(parse("pi -3"), usage);
    assert_eq!(parse("pi twenty"), usage);
    assert_eq!(parse("pi"), usage);
    assert_eq!(PI_USAGE, "Please provide a valid number! Example: pi 20");
}
