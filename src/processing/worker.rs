//! Background worker draining the ingest queue

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::ingestion::IngestPipeline;

use super::queue::{IngestOutcome, IngestTask};

/// Drains queued ingestion tasks, bounding how many pipelines run at once.
///
/// One failed ingestion resolves its own handle and records its own error;
/// the worker keeps running for every other task.
pub struct IngestWorker {
    pipeline: Arc<IngestPipeline>,
    max_concurrent: usize,
}

impl IngestWorker {
    /// Create a new worker over the shared pipeline
    pub fn new(pipeline: Arc<IngestPipeline>, max_concurrent: usize) -> Self {
        Self {
            pipeline,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run until the queue side is dropped
    pub async fn run(self, mut receiver: mpsc::Receiver<IngestTask>) {
        tracing::info!(
            "Ingest worker started ({} concurrent ingestions max)",
            self.max_concurrent
        );
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        while let Some(task) = receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // semaphore closed, shutting down
            };
            let pipeline = self.pipeline.clone();

            tokio::spawn(async move {
                let _permit = permit;
                let outcome = match pipeline.run(task.document_id).await {
                    Ok(doc) => IngestOutcome::Processed {
                        chunk_count: doc.chunk_count.unwrap_or(0),
                    },
                    Err(e) => IngestOutcome::Failed {
                        error: e.to_string(),
                    },
                };
                // Fire-and-forget callers drop the receiving half.
                let _ = task.done.send(outcome);
            });
        }

        tracing::info!("Ingest worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;
    use crate::processing::IngestQueue;
    use crate::storage::{Database, FileStore};
    use crate::types::document::{Document, DocumentStatus, FileType};

    async fn start_worker(
        db: Arc<Database>,
        files: Arc<FileStore>,
    ) -> IngestQueue {
        let pipeline = Arc::new(IngestPipeline::new(
            db,
            files,
            &ChunkingConfig {
                chunk_size: 20,
                chunk_overlap: 0,
            },
        ));
        let (queue, receiver) = IngestQueue::new(16);
        tokio::spawn(IngestWorker::new(pipeline, 2).run(receiver));
        queue
    }

    async fn upload(
        db: &Arc<Database>,
        files: &Arc<FileStore>,
        name: &str,
        contents: &[u8],
    ) -> Document {
        let stored = files.save(name, contents).await.unwrap();
        let doc = Document::new(
            name.to_string(),
            FileType::from_filename(name),
            contents.len() as u64,
            stored,
        );
        db.insert_document(&doc).unwrap();
        doc
    }

    #[tokio::test]
    async fn submitted_documents_reach_processed() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::in_memory().unwrap());
        let files = Arc::new(FileStore::new(dir.path()).unwrap());
        let queue = start_worker(db.clone(), files.clone()).await;

        let doc = upload(&db, &files, "facts.txt", b"The sky is blue. Grass is green.").await;

        let handle = queue.submit(doc.id).await.unwrap();
        let outcome = handle.wait().await.unwrap();
        assert_eq!(outcome, IngestOutcome::Processed { chunk_count: 2 });

        let stored = db.get_document(&doc.id).unwrap().unwrap();
        assert_eq!(stored.status, DocumentStatus::Processed);
    }

    #[tokio::test]
    async fn a_failing_task_does_not_stop_the_worker() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::in_memory().unwrap());
        let files = Arc::new(FileStore::new(dir.path()).unwrap());
        let queue = start_worker(db.clone(), files.clone()).await;

        let bad = upload(&db, &files, "archive.zip", b"PK\x03\x04").await;
        let good = upload(&db, &files, "ok.txt", b"One sentence.").await;

        let bad_handle = queue.submit(bad.id).await.unwrap();
        match bad_handle.wait().await.unwrap() {
            IngestOutcome::Failed { error } => assert!(!error.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }

        let good_handle = queue.submit(good.id).await.unwrap();
        assert_eq!(
            good_handle.wait().await.unwrap(),
            IngestOutcome::Processed { chunk_count: 1 }
        );

        let stored = db.get_document(&bad.id).unwrap().unwrap();
        assert_eq!(stored.status, DocumentStatus::Error);
    }
}
