use crate::error::api::ApiError;

use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PipelineError {
    #[error("Start Error: {message} {location}")]
    Start {
        message: String,
        location: ErrorLocation,
        #[source]
        source: ApiError,
    },

    #[error("Superseded Error: {message} {location}")]
    Superseded {
        message: String,
        location: ErrorLocation,
    },

    #[error("Actor Stopped Error: {message} {location}")]
    ActorStopped {
        message: String,
        location: ErrorLocation,
    },

    #[error("Runtime Error: {message} {location}")]
    Runtime {
        message: String,
        location: ErrorLocation,
    },
}
