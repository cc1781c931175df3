use common::ErrorLocation;
use pi_core::error::CoreError;

use thiserror::Error;

/// Errors that end or prevent a terminal session.
///
/// Failures inside a running session (wrong digits, unreachable backend) are
/// shown to the player as text instead.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from this App
    #[error("Pi Buddy Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Terminal input/output failed
    #[error("Terminal IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
    },

    /// Error from pi-core operations (config, pipeline, high score)
    #[error(transparent)]
    Core(#[from] CoreError),
}
