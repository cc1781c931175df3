use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// A single decimal digit, `'0'..='9'`.
///
/// Serialized as a one-character JSON string (`"4"`), which is what the
/// backend expects for both play inputs and quiz guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digit(char);

impl Digit {
    /// Interpret a keypress or button label as a digit.
    ///
    /// Only a key that is exactly one ASCII decimal digit qualifies; anything
    /// else (`""`, `"12"`, `"a"`, `"Backspace"`) yields `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Some(Self(c)),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl TryFrom<char> for Digit {
    type Error = ModelError;

    #[track_caller]
    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii_digit() {
            Ok(Self(c))
        } else {
            Err(ModelError::Validation {
                message: format!("'{c}' is not a decimal digit"),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

impl TryFrom<String> for Digit {
    type Error = ModelError;

    #[track_caller]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_key(&value).ok_or_else(|| ModelError::Validation {
            message: format!("\"{value}\" is not a single decimal digit"),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl From<Digit> for String {
    fn from(digit: Digit) -> Self {
        digit.0.to_string()
    }
}

impl Display for Digit {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "{}", self.0)
    }
}
