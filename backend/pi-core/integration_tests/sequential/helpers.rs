//! Test helpers for sequential game integration tests.
//!
//! `ScriptedBackend` answers verification calls from the decimals of pi, records
//! every call, tracks how many calls overlap, and can hold calls behind a gate so
//! tests control when verdicts arrive.

use pi_core::api::GameBackend;
use pi_core::error::ApiError;

use common::{ErrorLocation, HttpStatusCode};
use models::{Digit, PlayResponse, StartGameRequest, StartGameResponse};

use std::panic::Location;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;

/// Decimals of pi after "3.".
pub const PI_DECIMALS: &str = "14159265358979323846";

pub const SCRIPTED_GAME_ID: &str = "scripted-game";

#[derive(Default)]
pub struct ScriptedBackend {
    calls: Mutex<Vec<Digit>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
    gate: Option<Semaphore>,
    start_gate: Option<Semaphore>,
    starts_waiting: AtomicUsize,
    fail_start: bool,
    transport_error_at: Option<usize>,
}

impl ScriptedBackend {
    /// Answers immediately after `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Holds every verification until [`release`](Self::release) grants a permit.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    /// Holds every start call until [`release_start`](Self::release_start) grants a permit.
    pub fn start_gated() -> Self {
        Self {
            start_gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    /// The `index`th verification call fails in transport.
    pub fn transport_error_at(index: usize) -> Self {
        Self {
            transport_error_at: Some(index),
            ..Self::default()
        }
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    pub fn release_start(&self, permits: usize) {
        if let Some(gate) = &self.start_gate {
            gate.add_permits(permits);
        }
    }

    pub fn starts_waiting(&self) -> usize {
        self.starts_waiting.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> String {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.as_char())
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl GameBackend for ScriptedBackend {
    async fn start_session(
        &self,
        request: &StartGameRequest,
    ) -> Result<StartGameResponse, ApiError> {
        if let Some(gate) = &self.start_gate {
            self.starts_waiting.fetch_add(1, Ordering::SeqCst);
            gate.acquire().await.unwrap().forget();
            self.starts_waiting.fetch_sub(1, Ordering::SeqCst);
        }

        if self.fail_start {
            return Err(ApiError::Server {
                status: HttpStatusCode(503),
                message: String::from("unavailable"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(StartGameResponse {
            game_id: String::from(SCRIPTED_GAME_ID),
            start_position: Some(request.start_position()),
        })
    }

    async fn verify_digit(&self, _game_id: &str, digit: Digit) -> Result<PlayResponse, ApiError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(digit);
            calls.len() - 1
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.transport_error_at == Some(index) {
            return Err(ApiError::Http {
                message: String::from("connection reset"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let expected = PI_DECIMALS.chars().nth(index).unwrap();
        let correct = digit.as_char() == expected;

        Ok(PlayResponse {
            correct,
            expected_digit: (!correct).then(|| expected.to_string()),
        })
    }
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    assert!(result.is_ok(), "Condition not met within 2 seconds");
}

pub fn digit(c: char) -> Digit {
    Digit::try_from(c).unwrap()
}
