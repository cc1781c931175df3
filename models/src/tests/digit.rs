use crate::{Digit, ModelError};

/// **VALUE**: Verifies that only a single ASCII decimal digit is accepted as a key.
///
/// **WHY THIS MATTERS**: Keyboard and button input both funnel through `from_key`.
/// Anything that slips through here would be sent to the backend as a guess.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Multi-character keys ("12", "Backspace") are truncated instead of rejected
/// - Non-ASCII digits (Arabic-Indic "٣") pass `char::is_numeric`-style checks
/// - The empty string panics
#[test]
fn given_various_keys_when_from_key_called_then_only_single_digits_accepted() {
    // GIVEN / WHEN / THEN: Valid digits
    for key in ["0", "4", "9"] {
        let digit = Digit::from_key(key);
        assert!(digit.is_some(), "{key} should be a digit");
        assert_eq!(digit.unwrap().to_string(), key);
    }

    // GIVEN / WHEN / THEN: Invalid keys
    for key in ["", "12", "a", " ", "Backspace", "٣", "-1"] {
        assert!(Digit::from_key(key).is_none(), "{key:?} should be rejected");
    }
}

#[test]
fn given_letter_when_try_from_char_then_returns_validation_error() {
    let result = Digit::try_from('x');

    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert!(message.contains("'x'"), "Message should name the input");
        }
        Ok(_) => panic!("'x' must not become a Digit"),
    }
}

#[test]
fn given_digit_char_when_try_from_then_as_char_round_trips() {
    let digit = Digit::try_from('7').unwrap();
    assert_eq!(digit.as_char(), '7');
}

/// **VALUE**: Verifies the JSON shape the backend expects for a digit.
///
/// **WHY THIS MATTERS**: The play endpoint reads `{"input": "4"}`. Serializing as a
/// number or a char code would make every verification fail.
///
/// **BUG THIS CATCHES**: Would catch if the serde `into`/`try_from` attributes are removed.
#[test]
fn given_digit_when_serialized_then_is_one_character_string() {
    // GIVEN: A digit
    let digit = Digit::try_from('4').unwrap();

    // WHEN: Serializing
    let json = serde_json::to_string(&digit).unwrap();

    // THEN: It is a JSON string
    assert_eq!(json, "\"4\"");
}

#[test]
fn given_invalid_json_string_when_deserialized_then_fails() {
    let result: Result<Digit, _> = serde_json::from_str("\"45\"");
    assert!(result.is_err(), "Two characters are not a digit");
}
