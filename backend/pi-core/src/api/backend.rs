use crate::api::PiApiClient;
use crate::error::api::ApiError;

use models::{Digit, PlayResponse, StartGameRequest, StartGameResponse};

use std::future::Future;

/// The two backend calls the sequential pipeline depends on.
///
/// [`PiApiClient`] is the production implementation; tests substitute
/// scripted backends to control timing and verdicts.
pub trait GameBackend: Send + Sync + 'static {
    fn start_session(
        &self,
        request: &StartGameRequest,
    ) -> impl Future<Output = Result<StartGameResponse, ApiError>> + Send;

    fn verify_digit(
        &self,
        game_id: &str,
        digit: Digit,
    ) -> impl Future<Output = Result<PlayResponse, ApiError>> + Send;
}

impl GameBackend for PiApiClient {
    async fn start_session(
        &self,
        request: &StartGameRequest,
    ) -> Result<StartGameResponse, ApiError> {
        self.start_game(request).await
    }

    async fn verify_digit(&self, game_id: &str, digit: Digit) -> Result<PlayResponse, ApiError> {
        self.play_digit(game_id, digit).await
    }
}
