use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("High Score Read Error: {path}: {source} {location}")]
    Read {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("High Score Parse Error: {path}: {reason} {location}")]
    Parse {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("High Score Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("High Score Watch Error: {message} {location}")]
    Watch {
        message: String,
        location: ErrorLocation,
    },

    #[error("High Score Blocking Task Error: {message} {location}")]
    Blocking {
        message: String,
        location: ErrorLocation,
    },
}
