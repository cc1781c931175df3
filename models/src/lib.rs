//! Wire models for the Pi game backend.
//!
//! Pure data structures exchanged with the backend over JSON. Models carry
//! validation for their own invariants (a [`Digit`] is always `'0'..='9'`)
//! but no game logic; the backend is the authority on correctness.

pub mod chat;
pub mod digit;
pub mod error;
pub mod game;
pub mod quiz;

pub use chat::{ChatRequest, ChatResponse};
pub use digit::Digit;
pub use error::model_error::ModelError;
pub use game::builder::StartGameRequestBuilder;
pub use game::{GameMode, PlayRequest, PlayResponse, StartGameRequest, StartGameResponse};
pub use quiz::{QuizCheckRequest, QuizCheckResponse, QuizStartRequest, QuizStartResponse};

pub use common::ErrorLocation;

#[cfg(test)]
mod tests;
