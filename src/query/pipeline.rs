//! Query orchestration: load chunks, rank, compose, cite

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::storage::Database;
use crate::types::session::SourceCitation;

use super::composer::AnswerComposer;
use super::scorer::{AttributedChunk, RelevanceScorer, ScoredChunk};

/// Answer to a question, with citations and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub answer: String,
    pub sources: Vec<SourceCitation>,
    pub response_time_ms: u64,
}

/// Answers questions against a declared document set.
///
/// Chunks outside the given set are never consulted; the document set is the
/// sole access-control boundary. Storage failures propagate to the caller:
/// the result is either a complete outcome or an error, never partial.
pub struct QueryPipeline {
    db: Arc<Database>,
    scorer: RelevanceScorer,
    excerpt_length: usize,
}

impl QueryPipeline {
    /// Create a new query pipeline
    pub fn new(db: Arc<Database>, retrieval: &RetrievalConfig) -> Self {
        Self {
            db,
            scorer: RelevanceScorer::new(retrieval),
            excerpt_length: retrieval.excerpt_length,
        }
    }

    /// Answer a question using only chunks from the given documents
    pub fn answer(&self, question: &str, document_ids: &[Uuid]) -> Result<QueryOutcome> {
        let start = Instant::now();

        let chunks: Vec<AttributedChunk> = self
            .db
            .chunks_for_documents(document_ids)?
            .into_iter()
            .map(|(chunk, document_name)| AttributedChunk {
                chunk,
                document_name,
            })
            .collect();

        let ranked = self.scorer.rank(question, &chunks);
        let answer = AnswerComposer::compose(question, &ranked);
        let sources = ranked.iter().map(|s| self.citation(s)).collect();

        let response_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Query answered in {}ms ({} chunks considered, {} cited)",
            response_time_ms,
            chunks.len(),
            ranked.len()
        );

        Ok(QueryOutcome {
            answer,
            sources,
            response_time_ms,
        })
    }

    fn citation(&self, source: &ScoredChunk) -> SourceCitation {
        SourceCitation {
            document: source.document_name.clone(),
            page: source.chunk.page_number,
            excerpt: truncate_excerpt(&source.chunk.content, self.excerpt_length),
            relevance: source.score,
        }
    }
}

/// Truncate to `max_len`, appending a marker when cut. Backs off to a char
/// boundary so multi-byte text never splits mid-character.
fn truncate_excerpt(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
