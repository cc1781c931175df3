use crate::digit::Digit;

use serde::{Deserialize, Serialize};

/// Ask for a quiz question.
///
/// `position: None` lets the backend pick a random position up to `max_position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStartRequest {
    pub position: Option<u32>,
    pub max_position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStartResponse {
    pub quiz_id: String,
    pub position: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCheckRequest {
    pub guess: Digit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCheckResponse {
    pub correct: bool,
    #[serde(default)]
    pub expected_digit: Option<String>,
    #[serde(default)]
    pub message: String,
}
