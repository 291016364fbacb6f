//! Shared application state

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::ingestion::IngestPipeline;
use crate::processing::{IngestQueue, IngestWorker};
use crate::query::QueryPipeline;
use crate::storage::{Database, FileStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    db: Arc<Database>,
    files: Arc<FileStore>,
    ingest_queue: IngestQueue,
    query_pipeline: QueryPipeline,
}

impl AppState {
    /// Open storage, build the pipelines, and start the ingest worker.
    /// Must be called from within a tokio runtime.
    pub fn new(config: AppConfig) -> Result<Self> {
        let db = Arc::new(Database::new(&config.storage.database_path)?);
        tracing::info!("Database opened at {}", config.storage.database_path.display());

        let files = Arc::new(FileStore::new(&config.storage.upload_dir)?);
        tracing::info!("Upload directory: {}", config.storage.upload_dir.display());

        let pipeline = Arc::new(IngestPipeline::new(
            db.clone(),
            files.clone(),
            &config.chunking,
        ));
        let (ingest_queue, receiver) = IngestQueue::new(config.processing.queue_capacity);
        let worker = IngestWorker::new(pipeline, config.processing.worker_count());
        tokio::spawn(worker.run(receiver));

        let query_pipeline = QueryPipeline::new(db.clone(), &config.retrieval);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                files,
                ingest_queue,
                query_pipeline,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the record store
    pub fn db(&self) -> &Arc<Database> {
        &self.inner.db
    }

    /// Get the uploaded-file store
    pub fn files(&self) -> &Arc<FileStore> {
        &self.inner.files
    }

    /// Get the ingest submission queue
    pub fn ingest_queue(&self) -> &IngestQueue {
        &self.inner.ingest_queue
    }

    /// Get the query pipeline
    pub fn query_pipeline(&self) -> &QueryPipeline {
        &self.inner.query_pipeline
    }
}
