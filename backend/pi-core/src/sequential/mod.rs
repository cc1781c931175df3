//! Sequential recitation: the digit submission pipeline.
//!
//! Digits entered by the player are queued in entry order and verified by the
//! backend one at a time. The first rejected or failed verification latches the
//! session into [`Phase::Failed`] until it is reset.
//!
//! # Architecture
//!
//! - [`PipelineMachine`] holds all pipeline state and decides, synchronously,
//!   which digit (if any) to send next.
//! - [`SequentialGame`] owns one machine inside an actor task. Input handles
//!   post commands to it; every verification runs in its own task and posts its
//!   verdict back, so the actor is the only writer.

mod game;
mod machine;

pub use game::SequentialGame;
pub use machine::{
    Failure, Phase, PipelineMachine, PipelineSnapshot, Session, VerifyResult, VerifyTicket,
};

/// Shown when the start call fails.
pub const START_FAILED_MESSAGE: &str = "Failed to start game. Is the backend running?";

/// Shown when a verification call fails in transport.
pub const VERIFY_FAILED_MESSAGE: &str = "Error checking digit";
