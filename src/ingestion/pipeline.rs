//! Ingestion orchestration: extract, chunk, persist

use std::sync::Arc;
use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::storage::{Database, FileStore};
use crate::types::document::{Chunk, Document};

use super::chunker::TextChunker;
use super::extractor::{hash_content, TextExtractor};

/// Drives a single document from uploaded bytes to persisted chunks.
///
/// Each stage persists a fresh document snapshot, so readers polling the
/// record see coarse progress checkpoints. Chunks are inserted before the
/// terminal `processed` flip: a crash mid-ingestion leaves the document in a
/// non-terminal state, never falsely `processed`.
pub struct IngestPipeline {
    db: Arc<Database>,
    files: Arc<FileStore>,
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline
    pub fn new(db: Arc<Database>, files: Arc<FileStore>, chunking: &ChunkingConfig) -> Self {
        Self {
            db,
            files,
            chunker: TextChunker::new(chunking.chunk_size, chunking.chunk_overlap),
        }
    }

    /// Process one document. A failure is recorded on the document record
    /// (terminal `error` state, no retry) and returned to the caller.
    pub async fn run(&self, document_id: Uuid) -> Result<Document> {
        match self.process(document_id).await {
            Ok(doc) => {
                tracing::info!(
                    "Document {} ('{}') processed: {} chunks",
                    doc.id,
                    doc.name,
                    doc.chunk_count.unwrap_or(0)
                );
                Ok(doc)
            }
            Err(e) => {
                tracing::error!("Ingestion failed for document {}: {}", document_id, e);
                self.record_failure(document_id, &e);
                Err(e)
            }
        }
    }

    async fn process(&self, document_id: Uuid) -> Result<Document> {
        let doc = self
            .db
            .get_document(&document_id)?
            .ok_or_else(|| Error::not_found(format!("document {}", document_id)))?;

        let doc = doc.begin_processing();
        self.db.update_document(&doc)?;

        let data = self.files.read(&doc.stored_path).await?;
        let extracted = TextExtractor::extract(&doc.name, doc.file_type, &data)?;
        if let Some(pages) = extracted.page_count {
            tracing::debug!("Document {} has {} pages", doc.id, pages);
        }

        let hash = hash_content(&extracted.content);
        let doc = doc.with_extracted(extracted.content, hash);
        self.db.update_document(&doc)?;

        let drafts = self.chunker.split(doc.content.as_deref().unwrap_or(""));
        let doc = doc.with_chunked();
        self.db.update_document(&doc)?;

        let chunks: Vec<Chunk> = drafts
            .into_iter()
            .map(|draft| Chunk::new(doc.id, draft.content, draft.chunk_index))
            .collect();
        self.db.insert_chunks(&chunks)?;

        let doc = doc.into_processed(chunks.len() as u32);
        self.db.update_document(&doc)?;
        Ok(doc)
    }

    /// Best effort: storage may be the thing that failed, and the document
    /// may already be gone.
    fn record_failure(&self, document_id: Uuid, error: &Error) {
        match self.db.get_document(&document_id) {
            Ok(Some(doc)) => {
                let doc = doc.into_error(error.to_string());
                if let Err(e) = self.db.update_document(&doc) {
                    tracing::error!(
                        "Failed to record ingestion error for document {}: {}",
                        document_id,
                        e
                    );
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    "Failed to load document {} while recording its error: {}",
                    document_id,
                    e
                );
            }
        }
    }
}
