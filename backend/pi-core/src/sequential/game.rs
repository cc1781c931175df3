use crate::api::GameBackend;
use crate::error::api::ApiError;
use crate::error::pipeline::PipelineError;
use crate::high_score::HighScoreStore;
use crate::sequential::machine::{
    PipelineMachine, PipelineSnapshot, Session, VerifyResult, VerifyTicket,
};

use common::ErrorLocation;
use models::{Digit, StartGameRequest};

use std::panic::Location;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};

/// Commands processed by the game actor.
#[derive(Debug)]
enum GameCommand {
    /// Reset for a start call; replies with the epoch the start belongs to.
    Prepare(oneshot::Sender<u64>),
    Begin {
        epoch: u64,
        session: Session,
        accepted: oneshot::Sender<bool>,
    },
    StartFailed {
        epoch: u64,
    },
    Submit(Digit),
    Verified {
        ticket: VerifyTicket,
        result: VerifyResult,
    },
    Reset,
    Settle(oneshot::Sender<()>),
}

/// Handle to a running sequential game.
///
/// Cloning is cheap; all clones feed the same actor. Submitting never waits
/// on the network: digits are queued and verified in entry order with at most
/// one verification call outstanding.
pub struct SequentialGame<B: GameBackend> {
    backend: Arc<B>,
    command_tx: mpsc::UnboundedSender<GameCommand>,
    snapshot_rx: watch::Receiver<PipelineSnapshot>,
}

impl<B: GameBackend> Clone for SequentialGame<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            command_tx: self.command_tx.clone(),
            snapshot_rx: self.snapshot_rx.clone(),
        }
    }
}

impl<B: GameBackend> SequentialGame<B> {
    /// Spawn the game actor on the current tokio runtime.
    ///
    /// When `high_score` is set, every confirmed digit records the new score.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Runtime`] when called outside a tokio runtime.
    #[track_caller]
    pub fn spawn(backend: Arc<B>, high_score: Option<HighScoreStore>) -> Result<Self, PipelineError> {
        let runtime = Handle::try_current().map_err(|e| PipelineError::Runtime {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(PipelineSnapshot::default());

        runtime.spawn(game_actor(
            command_rx,
            command_tx.downgrade(),
            Arc::clone(&backend),
            snapshot_tx,
            high_score,
        ));
        info!("Sequential game actor spawned");

        Ok(Self {
            backend,
            command_tx,
            snapshot_rx,
        })
    }

    /// Start a new session, discarding whatever session was active.
    ///
    /// On failure the game stays idle with a start error message. A `reset` or
    /// another `start` issued while the backend call is pending wins: the session
    /// is dropped and [`PipelineError::Superseded`] is returned.
    pub async fn start(&self, request: StartGameRequest) -> Result<Session, PipelineError> {
        let (epoch_tx, epoch_rx) = oneshot::channel();
        self.send(GameCommand::Prepare(epoch_tx))?;
        let epoch = epoch_rx.await.map_err(|e| PipelineError::ActorStopped {
            message: format!("Game actor dropped start request: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let response = self.backend.start_session(&request).await.and_then(|r| {
            if r.game_id.is_empty() {
                Err(ApiError::MissingGameId {
                    location: ErrorLocation::from(Location::caller()),
                })
            } else {
                Ok(r)
            }
        });

        match response {
            Ok(response) => {
                let session = Session {
                    game_id: response.game_id,
                    start_position: response
                        .start_position
                        .unwrap_or(request.start_position()),
                };

                let (accepted_tx, accepted_rx) = oneshot::channel();
                self.send(GameCommand::Begin {
                    epoch,
                    session: session.clone(),
                    accepted: accepted_tx,
                })?;
                let accepted = accepted_rx.await.map_err(|e| PipelineError::ActorStopped {
                    message: format!("Game actor dropped start request: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                })?;

                if !accepted {
                    return Err(PipelineError::Superseded {
                        message: format!(
                            "Session {} was reset before it began",
                            session.game_id
                        ),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }

                Ok(session)
            }
            Err(e) => {
                warn!("Start game failed: {e}");
                self.send(GameCommand::StartFailed { epoch })?;
                Err(PipelineError::Start {
                    message: String::from("Backend refused to start a session"),
                    location: ErrorLocation::from(Location::caller()),
                    source: e,
                })
            }
        }
    }

    /// Queue one digit for verification.
    ///
    /// Silently ignored unless the game is playing.
    pub fn submit_digit(&self, digit: Digit) -> Result<(), PipelineError> {
        self.send(GameCommand::Submit(digit))
    }

    /// Queue a raw keypress or button label.
    ///
    /// Returns `Ok(false)` when the key is not a single decimal digit.
    pub fn submit_key(&self, key: &str) -> Result<bool, PipelineError> {
        match Digit::from_key(key) {
            Some(digit) => self.submit_digit(digit).map(|_| true),
            None => {
                debug!("Ignoring non-digit key {key:?}");
                Ok(false)
            }
        }
    }

    /// Drop the session and all pipeline state.
    pub fn reset(&self) -> Result<(), PipelineError> {
        self.send(GameCommand::Reset)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Wait until every digit submitted so far has been verified or dropped.
    pub async fn settled(&self) -> Result<PipelineSnapshot, PipelineError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(GameCommand::Settle(done_tx))?;

        done_rx.await.map_err(|e| PipelineError::ActorStopped {
            message: format!("Game actor dropped settle request: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(self.snapshot())
    }

    #[track_caller]
    fn send(&self, command: GameCommand) -> Result<(), PipelineError> {
        self.command_tx
            .send(command)
            .map_err(|e| PipelineError::ActorStopped {
                message: format!("Game actor died: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

/// The game actor task.
///
/// Owns the pipeline machine and processes commands sequentially. Verification
/// calls run in spawned tasks holding a strong sender, so the actor keeps
/// running until every handle is dropped and no call is outstanding.
async fn game_actor<B: GameBackend>(
    mut command_rx: mpsc::UnboundedReceiver<GameCommand>,
    command_tx: mpsc::WeakUnboundedSender<GameCommand>,
    backend: Arc<B>,
    snapshot_tx: watch::Sender<PipelineSnapshot>,
    high_score: Option<HighScoreStore>,
) {
    let mut machine = PipelineMachine::new();
    let mut settle_waiters: Vec<oneshot::Sender<()>> = Vec::new();
    let mut best_known = match &high_score {
        Some(store) => store.load_async().await.unwrap_or_else(|e| {
            warn!("Failed to read high score, starting from 0: {e}");
            0
        }),
        None => 0,
    };

    while let Some(command) = command_rx.recv().await {
        let mut new_best = None;
        let next = match command {
            GameCommand::Prepare(reply) => {
                machine.reset();
                let _ = reply.send(machine.epoch());
                None
            }
            GameCommand::Begin {
                epoch,
                session,
                accepted,
            } => {
                let current = epoch == machine.epoch();
                if current {
                    machine.begin(session);
                } else {
                    info!(
                        "Dropping session {}: reset while it was starting",
                        session.game_id
                    );
                }
                let _ = accepted.send(current);
                None
            }
            GameCommand::StartFailed { epoch } => {
                if epoch == machine.epoch() {
                    machine.start_failed();
                }
                None
            }
            GameCommand::Submit(digit) => machine.submit(digit),
            GameCommand::Verified { ticket, result } => {
                let next = machine.complete(ticket, result);
                let score = u32::try_from(machine.score()).unwrap_or(u32::MAX);
                if score > best_known {
                    new_best = Some(score);
                }
                next
            }
            GameCommand::Reset => {
                machine.reset();
                None
            }
            GameCommand::Settle(done) => {
                settle_waiters.push(done);
                None
            }
        };

        if let Some(ticket) = next {
            dispatch_verification(ticket, &backend, &command_tx);
        }

        if let (Some(store), Some(score)) = (&high_score, new_best) {
            best_known = record_high_score(store, score).await;
        }

        snapshot_tx.send_replace(machine.snapshot());

        if machine.is_settled() {
            for waiter in settle_waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }

    debug!("Sequential game actor stopped");
}

fn dispatch_verification<B: GameBackend>(
    ticket: VerifyTicket,
    backend: &Arc<B>,
    command_tx: &mpsc::WeakUnboundedSender<GameCommand>,
) {
    let Some(reply_tx) = command_tx.upgrade() else {
        warn!("No game handles left, not verifying {}", ticket.digit);
        return;
    };
    let backend = Arc::clone(backend);

    tokio::spawn(async move {
        debug!("Verifying {} for session {}", ticket.digit, ticket.game_id);
        let result = VerifyResult::from(backend.verify_digit(&ticket.game_id, ticket.digit).await);

        if reply_tx.send(GameCommand::Verified { ticket, result }).is_err() {
            warn!("Game actor gone before verdict arrived");
        }
    });
}

/// Persist `score` and return the best score now known to be stored.
async fn record_high_score(store: &HighScoreStore, score: u32) -> u32 {
    match store.record_async(score).await {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Failed to record high score {score}: {e}");
            score
        }
    }
}
