//! Ordered, fire-and-forget persistence of the current scene index.
//!
//! Scene transitions never wait on storage. Each write is queued to a single
//! background task that applies writes in the order they were issued, so the
//! stored value always converges on the most recent transition.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use branchline_core::error::StorageError;
use branchline_core::progress::ProgressStore;

#[derive(Debug)]
enum Request {
    Write {
        index: usize,
        done: oneshot::Sender<Result<(), StorageError>>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background task that owns progress writes for one session.
///
/// The task exits once the writer is dropped and every queued write has been
/// applied.
#[derive(Debug, Clone)]
pub struct ProgressWriter {
    requests: mpsc::UnboundedSender<Request>,
}

impl ProgressWriter {
    /// Spawns the writer task on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn spawn(store: Arc<dyn ProgressStore>) -> Self {
        let (requests, mut queue) = mpsc::unbounded_channel::<Request>();
        tokio::spawn(async move {
            while let Some(request) = queue.recv().await {
                match request {
                    Request::Write { index, done } => {
                        let result = store.write(index).await;
                        match &result {
                            Ok(()) => debug!(scene_index = index, "progress saved"),
                            Err(e) => {
                                warn!(scene_index = index, error = %e, "failed to save progress");
                            }
                        }
                        // Nobody may be waiting for the confirmation.
                        let _ = done.send(result);
                    }
                    Request::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });
        Self { requests }
    }

    /// Queues a write of `index` and returns immediately.
    pub fn submit(&self, index: usize) -> PendingWrite {
        let (done, confirmation) = oneshot::channel();
        if self.requests.send(Request::Write { index, done }).is_err() {
            warn!(scene_index = index, "progress writer has stopped; write dropped");
        }
        PendingWrite { confirmation }
    }

    /// Waits until every write submitted before this call has been applied
    /// (or has failed). Returns at once if the writer task has stopped.
    pub async fn flush(&self) {
        let (done, flushed) = oneshot::channel();
        if self.requests.send(Request::Flush(done)).is_ok() {
            let _ = flushed.await;
        }
    }
}

/// Confirmation channel for one queued write. Dropping it is fine; the write
/// still happens.
#[derive(Debug)]
pub struct PendingWrite {
    confirmation: oneshot::Receiver<Result<(), StorageError>>,
}

impl PendingWrite {
    /// Waits for the write to reach the store.
    ///
    /// # Errors
    ///
    /// Returns the store's `StorageError`, or `StorageError::Unavailable` if
    /// the writer stopped before applying the write.
    pub async fn confirm(self) -> Result<(), StorageError> {
        self.confirmation.await.unwrap_or_else(|_| {
            Err(StorageError::Unavailable(
                "progress writer stopped before the write was applied".into(),
            ))
        })
    }
}
