//! HTTP client for the Pi game backend.
//!
//! All endpoints are JSON `POST`s relative to one base URL
//! (default [`DEFAULT_API_BASE_URL`](crate::DEFAULT_API_BASE_URL)).

mod backend;

pub use backend::GameBackend;

use crate::error::api::ApiError;

use common::{ErrorLocation, HttpStatusCode};
use models::{
    ChatRequest, ChatResponse, Digit, PlayRequest, PlayResponse, QuizCheckRequest,
    QuizCheckResponse, QuizStartRequest, QuizStartResponse, StartGameRequest, StartGameResponse,
};

use std::panic::Location;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const START_GAME_ENDPOINT: &str = "start";
const GAME_ENDPOINT: &str = "game";
const PLAY_ENDPOINT: &str = "play";
const QUIZ_START_ENDPOINT: &str = "start";
const QUIZ_ENDPOINT: &str = "quiz";
const QUIZ_CHECK_ENDPOINT: &str = "check";
const CHAT_ENDPOINT: &str = "chat";

#[derive(Debug, Clone)]
pub struct PiApiClient {
    base_url: Url,
    client: Client,
}

impl PiApiClient {
    pub fn new(base_url_str: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url_str, DEFAULT_TIMEOUT_DURATION)
    }

    pub fn with_timeout(base_url_str: &str, timeout: Duration) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let base_url = if base_url_str.ends_with('/') {
            Url::parse(base_url_str)?
        } else {
            Url::parse(&format!("{base_url_str}/"))?
        };
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    ///
    /// Backend-issued ids are opaque, so `/`, `?`, `#` and `%` inside them are
    /// escaped rather than interpreted. `.` and `..` cannot be represented and
    /// are rejected.
    #[track_caller]
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::InvalidPathSegment {
                segment: bad.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::UrlParse {
                message: format!("{} cannot be a base URL", self.base_url),
                location: ErrorLocation::from(Location::caller()),
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn post_json<B, R>(&self, url: Url, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url_text = url.to_string();
        debug!("POST {url_text}");

        let response = self.client.post(url).json(body).send().await?;
        let status = HttpStatusCode::from(response.status().as_u16());

        if !status.is_success() {
            if status.is_client_error() {
                warn!("Backend rejected POST {url_text} with {status}");
            } else if status.is_server_error() {
                warn!("Backend failed POST {url_text} with {status}");
            }
            return Err(ApiError::Server {
                status,
                message: response.text().await.unwrap_or_default(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let text = response.text().await?;
        let parsed: R = serde_json::from_str(&text)?;

        Ok(parsed)
    }

    /// Open a sequential session.
    ///
    /// # Errors
    /// Returns [`ApiError::MissingGameId`] if the backend answers 2xx without a game id.
    pub async fn start_game(
        &self,
        request: &StartGameRequest,
    ) -> Result<StartGameResponse, ApiError> {
        let url = self.endpoint_url(&[START_GAME_ENDPOINT])?;
        let response: StartGameResponse = self.post_json(url, request).await?;

        if response.game_id.is_empty() {
            return Err(ApiError::MissingGameId {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(response)
    }

    /// Ask the backend whether `digit` is the next digit of the session.
    pub async fn play_digit(&self, game_id: &str, digit: Digit) -> Result<PlayResponse, ApiError> {
        let url = self.endpoint_url(&[GAME_ENDPOINT, game_id, PLAY_ENDPOINT])?;
        self.post_json(url, &PlayRequest { input: digit }).await
    }

    pub async fn start_quiz(
        &self,
        request: &QuizStartRequest,
    ) -> Result<QuizStartResponse, ApiError> {
        let url = self.endpoint_url(&[QUIZ_ENDPOINT, QUIZ_START_ENDPOINT])?;
        self.post_json(url, request).await
    }

    pub async fn check_guess(
        &self,
        quiz_id: &str,
        guess: Digit,
    ) -> Result<QuizCheckResponse, ApiError> {
        let url = self.endpoint_url(&[QUIZ_ENDPOINT, quiz_id, QUIZ_CHECK_ENDPOINT])?;
        self.post_json(url, &QuizCheckRequest { guess }).await
    }

    /// Send one chat message; pass back the returned conversation id to continue it.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let url = self.endpoint_url(&[CHAT_ENDPOINT])?;
        self.post_json(url, request).await
    }
}
