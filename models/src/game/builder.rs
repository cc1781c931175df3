use crate::error::model_error::ModelError;
use crate::game::{FIRST_POSITION, GameMode, StartGameRequest};

use common::ErrorLocation;

use std::panic::Location;

/// Builder for creating validated StartGameRequest instances.
///
/// Standard mode pins the start position to the first decimal; custom mode
/// requires an explicit position of at least 1.
#[derive(Debug, Default)]
pub struct StartGameRequestBuilder {
    mode: Option<GameMode>,
    start_position: Option<u32>,
}

impl StartGameRequestBuilder {
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_start_position(mut self, position: u32) -> Self {
        self.start_position = Some(position);
        self
    }

    /// Build the StartGameRequest with validation.
    #[track_caller]
    pub fn build(self) -> Result<StartGameRequest, ModelError> {
        let mode = self.mode.unwrap_or_default();

        let start_position = match mode {
            GameMode::Standard => match self.start_position {
                None | Some(FIRST_POSITION) => FIRST_POSITION,
                Some(other) => {
                    return Err(ModelError::Validation {
                        message: format!(
                            "Standard mode always starts at position {FIRST_POSITION}, got {other}"
                        ),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            },
            GameMode::Custom => {
                let position = self.start_position.ok_or_else(|| ModelError::Validation {
                    message: String::from("Custom mode requires a start position"),
                    location: ErrorLocation::from(Location::caller()),
                })?;

                if position < FIRST_POSITION {
                    return Err(ModelError::Validation {
                        message: format!("Start position must be at least {FIRST_POSITION}"),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                position
            }
        };

        Ok(StartGameRequest {
            mode,
            start_position,
        })
    }
}
