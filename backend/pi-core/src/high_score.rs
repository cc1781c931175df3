//! Locally persisted high score.
//!
//! A single integer stored as `{"piHighScore": n}` in the data directory. Writes
//! only ever raise the value. Several processes may share the file; the last
//! writer wins and [`HighScoreStore::watch`] picks up their changes by polling.
//!
//! `load` and `record` are blocking file operations. Async callers use
//! [`HighScoreStore::load_async`] and [`HighScoreStore::record_async`], which run
//! them on the blocking pool.

use crate::error::high_score::HighScoreError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

const HIGH_SCORE_FILE_NAME: &str = "high_score.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    #[serde(rename = "piHighScore", default)]
    pi_high_score: u32,
}

#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(HIGH_SCORE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current stored value; 0 when nothing has been stored yet.
    pub fn load(&self) -> Result<u32, HighScoreError> {
        if !self.path.exists() {
            return Ok(0);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| HighScoreError::Read {
            location: ErrorLocation::from(Location::caller()),
            path: self.path.clone(),
            source: e,
        })?;

        let file: HighScoreFile =
            serde_json::from_str(&contents).map_err(|e| HighScoreError::Parse {
                location: ErrorLocation::from(Location::caller()),
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        Ok(file.pi_high_score)
    }

    /// Store `max(stored, score)` and return the stored value afterwards.
    ///
    /// A corrupt file is treated as 0 and overwritten.
    pub fn record(&self, score: u32) -> Result<u32, HighScoreError> {
        let current = match self.load() {
            Ok(current) => current,
            Err(HighScoreError::Parse { reason, .. }) => {
                warn!("Ignoring corrupt high score file: {reason}");
                0
            }
            Err(e) => return Err(e),
        };

        if score <= current {
            return Ok(current);
        }

        self.write(score)?;
        info!("New high score: {score}");
        Ok(score)
    }

    /// [`load`](Self::load) on the blocking thread pool.
    pub async fn load_async(&self) -> Result<u32, HighScoreError> {
        let store = self.clone();
        run_blocking(move || store.load()).await
    }

    /// [`record`](Self::record) on the blocking thread pool.
    pub async fn record_async(&self, score: u32) -> Result<u32, HighScoreError> {
        let store = self.clone();
        run_blocking(move || store.record(score)).await
    }

    fn write(&self, score: u32) -> Result<(), HighScoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| HighScoreError::Write {
                location: ErrorLocation::from(Location::caller()),
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        // Per-process temp name so concurrent writers never share a temp file
        let temp_path = self
            .path
            .with_extension(format!("json.{}.tmp", std::process::id()));

        let json = serde_json::to_string(&HighScoreFile {
            pi_high_score: score,
        })
        .map_err(|e| HighScoreError::Parse {
            location: ErrorLocation::from(Location::caller()),
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| HighScoreError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| HighScoreError::Write {
            location: ErrorLocation::from(Location::caller()),
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Observe the stored value, including changes made by other processes.
    ///
    /// The poller stops once every receiver has been dropped.
    ///
    /// # Errors
    ///
    /// Returns [`HighScoreError::Watch`] when called outside a tokio runtime.
    #[track_caller]
    pub fn watch(&self, poll_interval: Duration) -> Result<watch::Receiver<u32>, HighScoreError> {
        let runtime = Handle::try_current().map_err(|e| HighScoreError::Watch {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let initial = self.load().unwrap_or_else(|e| {
            warn!("Failed to read high score, starting from 0: {e}");
            0
        });
        let (score_tx, score_rx) = watch::channel(initial);
        let store = self.clone();

        runtime.spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = score_tx.closed() => break,
                    _ = ticker.tick() => {}
                }

                match store.load_async().await {
                    Ok(latest) => {
                        score_tx.send_if_modified(|current| {
                            if *current == latest {
                                false
                            } else {
                                *current = latest;
                                true
                            }
                        });
                    }
                    Err(e) => debug!("High score poll failed: {e}"),
                }
            }

            debug!("High score watcher stopped");
        });

        Ok(score_rx)
    }
}

#[track_caller]
fn run_blocking<F>(operation: F) -> impl Future<Output = Result<u32, HighScoreError>>
where
    F: FnOnce() -> Result<u32, HighScoreError> + Send + 'static,
{
    let location = ErrorLocation::from(Location::caller());
    let task = tokio::task::spawn_blocking(operation);

    async move {
        task.await.map_err(|e| HighScoreError::Blocking {
            message: e.to_string(),
            location,
        })?
    }
}
