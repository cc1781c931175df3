use crate::error::api::ApiError;
use crate::sequential::{START_FAILED_MESSAGE, VERIFY_FAILED_MESSAGE};

use models::{Digit, PlayResponse};

use std::collections::VecDeque;

use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No session.
    #[default]
    Idle,
    Playing,
    /// Terminal until reset.
    Failed,
}

/// One play-through, as issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub game_id: String,
    pub start_position: u32,
}

/// Why a session latched into [`Phase::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Mismatch {
        submitted: Digit,
        expected: Option<String>,
    },
    Transport {
        submitted: Digit,
        message: String,
    },
}

impl Failure {
    /// Text shown to the player.
    pub fn display_message(&self) -> String {
        match self {
            Failure::Mismatch { expected, .. } => {
                format!("Wrong! Expected: {}", expected.as_deref().unwrap_or("?"))
            }
            Failure::Transport { .. } => VERIFY_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn expected_digit(&self) -> Option<&str> {
        match self {
            Failure::Mismatch { expected, .. } => expected.as_deref(),
            Failure::Transport { .. } => None,
        }
    }
}

/// Permission to send exactly one verification call.
///
/// Tickets are stamped with the session epoch; a completed ticket from an
/// earlier epoch is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyTicket {
    epoch: u64,
    pub game_id: String,
    pub digit: Digit,
}

/// Outcome of one verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Correct,
    Incorrect { expected: Option<String> },
    Transport(String),
}

impl From<Result<PlayResponse, ApiError>> for VerifyResult {
    fn from(result: Result<PlayResponse, ApiError>) -> Self {
        match result {
            Ok(response) if response.correct => VerifyResult::Correct,
            Ok(response) => VerifyResult::Incorrect {
                expected: response.expected_digit,
            },
            Err(e) => VerifyResult::Transport(e.to_string()),
        }
    }
}

/// Read-only copy of the pipeline, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineSnapshot {
    pub phase: Phase,
    pub session: Option<Session>,
    pub confirmed: String,
    pub score: usize,
    pub pending: usize,
    pub in_flight: Option<Digit>,
    pub failure: Option<Failure>,
    pub message: Option<String>,
}

impl PipelineSnapshot {
    pub fn is_settled(&self) -> bool {
        self.in_flight.is_none() && self.pending == 0
    }
}

#[derive(Debug, Default)]
pub struct PipelineMachine {
    epoch: u64,
    session: Option<Session>,
    confirmed: String,
    pending: VecDeque<Digit>,
    in_flight: Option<Digit>,
    failure: Option<Failure>,
    start_error: Option<String>,
}

impl PipelineMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Playing` with a fresh session, from any phase.
    pub fn begin(&mut self, session: Session) {
        self.clear();
        info!(
            "Session {} started at position {}",
            session.game_id, session.start_position
        );
        self.session = Some(session);
    }

    /// Back to `Idle`. Any call still in flight belongs to a dead epoch.
    pub fn reset(&mut self) {
        if let Some(session) = &self.session {
            info!("Session {} reset", session.game_id);
        }
        self.clear();
    }

    /// Record a failed start call; the machine stays `Idle`.
    pub fn start_failed(&mut self) {
        self.clear();
        self.start_error = Some(START_FAILED_MESSAGE.to_string());
    }

    fn clear(&mut self) {
        self.epoch += 1;
        self.session = None;
        self.confirmed.clear();
        self.pending.clear();
        self.in_flight = None;
        self.failure = None;
        self.start_error = None;
    }

    /// Queue a digit and try to send it. No-op unless `Playing`.
    pub fn submit(&mut self, digit: Digit) -> Option<VerifyTicket> {
        if self.phase() != Phase::Playing {
            debug!("Ignoring digit {digit}: pipeline is {:?}", self.phase());
            return None;
        }

        self.pending.push_back(digit);
        self.drain()
    }

    /// Hand out a ticket for the head of the queue, if nothing is in flight.
    pub fn drain(&mut self) -> Option<VerifyTicket> {
        if self.in_flight.is_some() || self.failure.is_some() {
            return None;
        }

        let game_id = self.session.as_ref()?.game_id.clone();
        let digit = self.pending.pop_front()?;
        self.in_flight = Some(digit);

        Some(VerifyTicket {
            epoch: self.epoch,
            game_id,
            digit,
        })
    }

    /// Apply the verdict for `ticket` and return the next ticket, if any.
    pub fn complete(&mut self, ticket: VerifyTicket, result: VerifyResult) -> Option<VerifyTicket> {
        if ticket.epoch != self.epoch || self.in_flight != Some(ticket.digit) {
            debug!(
                "Discarding verdict for {} from epoch {} (current {})",
                ticket.digit, ticket.epoch, self.epoch
            );
            return None;
        }

        self.in_flight = None;

        match result {
            VerifyResult::Correct => {
                self.confirmed.push(ticket.digit.as_char());
                debug!("Confirmed {} (score {})", ticket.digit, self.score());
                self.drain()
            }
            VerifyResult::Incorrect { expected } => {
                self.latch(Failure::Mismatch {
                    submitted: ticket.digit,
                    expected,
                });
                None
            }
            VerifyResult::Transport(message) => {
                self.latch(Failure::Transport {
                    submitted: ticket.digit,
                    message,
                });
                None
            }
        }
    }

    fn latch(&mut self, failure: Failure) {
        warn!(
            "Session failed at score {}: {} ({} queued digits dropped)",
            self.score(),
            failure.display_message(),
            self.pending.len()
        );
        self.pending.clear();
        self.failure = Some(failure);
    }

    pub fn phase(&self) -> Phase {
        match (&self.session, &self.failure) {
            (None, _) => Phase::Idle,
            (Some(_), None) => Phase::Playing,
            (Some(_), Some(_)) => Phase::Failed,
        }
    }

    /// Bumped by every `begin`, `reset` and `start_failed`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn confirmed(&self) -> &str {
        &self.confirmed
    }

    /// Always the length of the confirmed sequence.
    pub fn score(&self) -> usize {
        self.confirmed.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight(&self) -> Option<Digit> {
        self.in_flight
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn is_settled(&self) -> bool {
        self.in_flight.is_none() && self.pending.is_empty()
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            phase: self.phase(),
            session: self.session.clone(),
            confirmed: self.confirmed.clone(),
            score: self.score(),
            pending: self.pending.len(),
            in_flight: self.in_flight,
            failure: self.failure.clone(),
            message: self
                .failure
                .as_ref()
                .map(Failure::display_message)
                .or_else(|| self.start_error.clone()),
        }
    }
}
