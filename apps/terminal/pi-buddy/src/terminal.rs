//! The interactive session: routes parsed commands to the game, quiz and chat.

use crate::command::Command;
use crate::error::AppError;
use crate::view::{CLEAR_SCREEN, HELP_TEXT, ordinal, render_game, render_pi_decimal};

use pi_core::api::PiApiClient;
use pi_core::config::AppConfig;
use pi_core::error::CoreError;
use pi_core::high_score::HighScoreStore;
use pi_core::sequential::{PipelineSnapshot, SequentialGame};

use models::{ChatRequest, Digit, QuizStartRequest, StartGameRequest};

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::watch;

const QUIZ_START_FAILED_MESSAGE: &str = "Failed to start quiz. Is the backend running?";
const QUIZ_CHECK_FAILED_MESSAGE: &str = "Error checking guess";
const CHAT_FAILED_MESSAGE: &str = "Oops! Failed to connect to AI. Please try again!";

/// Quiz question waiting for an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuiz {
    pub quiz_id: String,
    pub position: u32,
}

/// What the terminal should print after a command.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Outcome {
    fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }
}

pub struct Terminal {
    config: AppConfig,
    client: PiApiClient,
    game: SequentialGame<PiApiClient>,
    high_score: watch::Receiver<u32>,
    quiz: Option<ActiveQuiz>,
    conversation_id: Option<String>,
}

impl Terminal {
    /// Build the client, spawn the game actor and start watching the high score.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: AppConfig, data_dir: &Path) -> Result<Self, AppError> {
        let client =
            PiApiClient::with_timeout(&config.server.api_base_url, config.request_timeout())
                .map_err(CoreError::from)?;
        let store = HighScoreStore::new(data_dir);
        let game = SequentialGame::spawn(Arc::new(client.clone()), Some(store.clone()))
            .map_err(CoreError::from)?;
        let high_score = store
            .watch(config.high_score_poll_interval())
            .map_err(CoreError::from)?;

        info!("Terminal ready, backend at {}", client.base_url());

        Ok(Self {
            config,
            client,
            game,
            high_score,
            quiz: None,
            conversation_id: None,
        })
    }

    pub fn greeting(&self) -> Vec<String> {
        vec![
            String::from("Welcome to Pi Buddy!"),
            format!("High score: {}", self.high_score()),
            String::from("Type \"help\" for available commands or just chat with me!"),
        ]
    }

    pub fn high_score(&self) -> u32 {
        *self.high_score.borrow()
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        self.game.snapshot()
    }

    pub fn active_quiz(&self) -> Option<&ActiveQuiz> {
        self.quiz.as_ref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub async fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::Start { position } => self.start(position).await,
            Command::Keys(keys) => self.keys(&keys).await,
            Command::Reset => self.reset().await,
            Command::Score => Outcome::lines(render_game(&self.game.snapshot())),
            Command::High => Outcome::line(format!("High score: {}", self.high_score())),
            Command::Quiz {
                position,
                max_position,
            } => self.start_quiz(position, max_position).await,
            Command::Guess(guess) => self.guess(&guess).await,
            Command::Pi(position) => Outcome::line(render_pi_decimal(position)),
            Command::Chat(message) => self.chat(message).await,
            Command::Help => Outcome::lines(HELP_TEXT.lines().map(String::from).collect()),
            Command::Clear => Outcome::line(CLEAR_SCREEN),
            Command::Quit => Outcome {
                lines: vec![String::from("Bye!")],
                quit: true,
            },
            Command::Empty => Outcome::default(),
            Command::Invalid(usage) => Outcome::line(usage),
        }
    }

    async fn start(&mut self, position: Option<u32>) -> Outcome {
        let request = match position {
            None => StartGameRequest::standard(),
            Some(position) => match StartGameRequest::custom(position) {
                Ok(request) => request,
                Err(e) => return Outcome::line(e.to_string()),
            },
        };

        let mut lines = Vec::new();
        match self.game.start(request).await {
            Ok(session) => {
                lines.push(format!(
                    "Run started at position {}. Type digits!",
                    session.start_position
                ));
            }
            Err(e) => warn!("{e}"),
        }

        lines.extend(self.settled_view().await);
        Outcome::lines(lines)
    }

    async fn keys(&mut self, keys: &str) -> Outcome {
        for key in keys.chars() {
            if let Err(e) = self.game.submit_key(key.encode_utf8(&mut [0; 4])) {
                return Outcome::line(e.to_string());
            }
        }

        Outcome::lines(self.settled_view().await)
    }

    async fn reset(&mut self) -> Outcome {
        if let Err(e) = self.game.reset() {
            return Outcome::line(e.to_string());
        }

        Outcome::lines(self.settled_view().await)
    }

    async fn settled_view(&self) -> Vec<String> {
        match self.game.settled().await {
            Ok(snapshot) => render_game(&snapshot),
            Err(e) => vec![e.to_string()],
        }
    }

    async fn start_quiz(&mut self, position: Option<u32>, max_position: Option<u32>) -> Outcome {
        let max_position = max_position
            .unwrap_or(self.config.game.max_quiz_position)
            .max(position.unwrap_or(0));
        let request = QuizStartRequest {
            position,
            max_position,
        };

        match self.client.start_quiz(&request).await {
            Ok(quiz) => {
                let mut lines = Vec::new();
                if !quiz.message.is_empty() {
                    lines.push(quiz.message.clone());
                }
                lines.push(format!(
                    "What is the {} decimal of pi? Answer with `guess <digit>`.",
                    ordinal(quiz.position)
                ));
                self.quiz = Some(ActiveQuiz {
                    quiz_id: quiz.quiz_id,
                    position: quiz.position,
                });
                Outcome::lines(lines)
            }
            Err(e) => {
                warn!("Quiz start failed: {e}");
                Outcome::line(QUIZ_START_FAILED_MESSAGE)
            }
        }
    }

    async fn guess(&mut self, guess: &str) -> Outcome {
        let Some(quiz) = self.quiz.clone() else {
            return Outcome::line("No quiz running. Type `quiz` to get a question.");
        };
        let Some(digit) = Digit::from_key(guess) else {
            return Outcome::line("Guess must be a single digit 0-9.");
        };

        match self.client.check_guess(&quiz.quiz_id, digit).await {
            Ok(verdict) => {
                self.quiz = None;

                let mut lines = vec![String::from(if verdict.correct {
                    "CORRECT!"
                } else {
                    "WRONG!"
                })];
                if !verdict.message.is_empty() {
                    lines.push(verdict.message);
                }
                if let (false, Some(expected)) = (verdict.correct, verdict.expected_digit) {
                    lines.push(format!(
                        "The {} decimal of pi is {expected}.",
                        ordinal(quiz.position)
                    ));
                }
                Outcome::lines(lines)
            }
            Err(e) => {
                warn!("Quiz check failed: {e}");
                Outcome::line(QUIZ_CHECK_FAILED_MESSAGE)
            }
        }
    }

    async fn chat(&mut self, message: String) -> Outcome {
        let request = ChatRequest {
            message,
            conversation_id: self.conversation_id.clone(),
        };

        match self.client.chat(&request).await {
            Ok(reply) => {
                if self.conversation_id.is_none() {
                    self.conversation_id = reply.conversation_id;
                }
                Outcome::line(format!("Pi Buddy: {}", reply.message))
            }
            Err(e) => {
                warn!("Chat failed: {e}");
                Outcome::line(CHAT_FAILED_MESSAGE)
            }
        }
    }
}
