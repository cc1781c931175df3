pub mod builder;

use crate::digit::Digit;
use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::panic::Location;

use serde::{Deserialize, Serialize};

const STANDARD_MODE_WIRE: u8 = 1;
const CUSTOM_MODE_WIRE: u8 = 2;

/// Position of the first decimal after "3.".
pub const FIRST_POSITION: u32 = 1;

/// How a sequential run picks its starting position.
///
/// Sent to the backend as an integer: `1` for standard, `2` for custom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameMode {
    /// Always starts at the first decimal.
    #[default]
    Standard,
    /// Starts at a caller-chosen position.
    Custom,
}

impl From<GameMode> for u8 {
    fn from(mode: GameMode) -> Self {
        match mode {
            GameMode::Standard => STANDARD_MODE_WIRE,
            GameMode::Custom => CUSTOM_MODE_WIRE,
        }
    }
}

impl TryFrom<u8> for GameMode {
    type Error = ModelError;

    #[track_caller]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            STANDARD_MODE_WIRE => Ok(GameMode::Standard),
            CUSTOM_MODE_WIRE => Ok(GameMode::Custom),
            other => Err(ModelError::Validation {
                message: format!("Unknown game mode: {other}"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Body of the start call.
///
/// Only built through [`StartGameRequest::standard`], [`StartGameRequest::custom`]
/// or [`StartGameRequestBuilder`](builder::StartGameRequestBuilder), so the start
/// position is always valid for the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartGameRequest {
    mode: GameMode,
    start_position: u32,
}

impl StartGameRequest {
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn start_position(&self) -> u32 {
        self.start_position
    }

    pub fn standard() -> Self {
        Self {
            mode: GameMode::Standard,
            start_position: FIRST_POSITION,
        }
    }

    /// Custom run starting at `start_position` (must be at least 1).
    #[track_caller]
    pub fn custom(start_position: u32) -> Result<Self, ModelError> {
        builder::StartGameRequestBuilder::default()
            .with_mode(GameMode::Custom)
            .with_start_position(start_position)
            .build()
    }
}

impl Default for StartGameRequest {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameResponse {
    pub game_id: String,
    #[serde(default)]
    pub start_position: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub input: Digit,
}

/// Verdict for one submitted digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayResponse {
    pub correct: bool,
    /// Present when `correct` is false.
    #[serde(default)]
    pub expected_digit: Option<String>,
}
