//! Submission queue for background document ingestion

use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A queued ingestion task
#[derive(Debug)]
pub struct IngestTask {
    pub document_id: Uuid,
    pub done: oneshot::Sender<IngestOutcome>,
}

/// Terminal result of one ingestion, as observed through an [`IngestHandle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Chunks are persisted and the document is queryable
    Processed { chunk_count: u32 },
    /// Ingestion failed; the document record carries the same message
    Failed { error: String },
}

/// Handle returned from [`IngestQueue::submit`].
///
/// Await [`IngestHandle::wait`] for completion, or drop it to fire and
/// forget; either way the document's status row records the outcome and can
/// be polled.
#[derive(Debug)]
pub struct IngestHandle {
    pub document_id: Uuid,
    done: oneshot::Receiver<IngestOutcome>,
}

impl IngestHandle {
    /// Wait for the ingestion to finish
    pub async fn wait(self) -> Result<IngestOutcome> {
        self.done
            .await
            .map_err(|_| Error::internal("ingest worker dropped the task"))
    }
}

/// Bounded submission queue feeding the ingest worker
#[derive(Clone)]
pub struct IngestQueue {
    sender: mpsc::Sender<IngestTask>,
}

impl IngestQueue {
    /// Create the queue and the receiver half handed to the worker
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<IngestTask>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Enqueue a document for background processing
    pub async fn submit(&self, document_id: Uuid) -> Result<IngestHandle> {
        let (done_tx, done_rx) = oneshot::channel();
        self.sender
            .send(IngestTask {
                document_id,
                done: done_tx,
            })
            .await
            .map_err(|_| Error::internal("ingest queue is closed"))?;

        tracing::debug!("Queued document {} for ingestion", document_id);
        Ok(IngestHandle {
            document_id,
            done: done_rx,
        })
    }
}
