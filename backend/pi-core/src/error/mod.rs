pub mod api;
pub mod config;
pub mod high_score;
pub mod pipeline;

pub use api::ApiError;
pub use config::ConfigError;
pub use high_score::HighScoreError;
pub use pipeline::PipelineError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    HighScore(#[from] HighScoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
