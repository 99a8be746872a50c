use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::models::StudentRecord;

use super::RosterSource;

pub type LoadResult = Result<Vec<StudentRecord>, LoadError>;

/// A one-shot roster load running on a background thread.
///
/// Poll it with [`try_finish`](Self::try_finish) from an event loop, or block
/// with [`wait`](Self::wait). Dropping or [`cancel`](Self::cancel)ling the
/// handle abandons the load; the worker owns nothing that needs cleaning up
/// and its late result is discarded.
pub struct PendingLoad {
    description: String,
    receiver: Receiver<LoadResult>,
}

impl PendingLoad {
    pub fn spawn(source: Arc<dyn RosterSource>) -> Self {
        let description = source.describe();
        let (sender, receiver) = mpsc::channel();
        info!(source = %description, "roster load started");

        let worker = thread::Builder::new()
            .name("roster-load".to_string())
            .spawn(move || {
                // The receiver is gone if the load was cancelled.
                let _ = sender.send(source.load());
            });

        if let Err(err) = worker {
            // The closure and its sender are dropped, so polling reports the
            // load as unavailable.
            warn!(error = %err, "could not start roster loader thread");
        }

        Self {
            description,
            receiver,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// `None` while the load is still running.
    pub fn try_finish(&self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(worker_vanished())),
        }
    }

    pub fn wait(self) -> LoadResult {
        self.receiver.recv().unwrap_or_else(|_| Err(worker_vanished()))
    }

    pub fn cancel(self) {
        debug!(source = %self.description, "roster load cancelled");
    }
}

fn worker_vanished() -> LoadError {
    LoadError::Unavailable("loader stopped without producing a roster".to_string())
}
