//! Question answering over session-scoped document chunks

mod composer;
mod pipeline;
mod scorer;

pub use composer::{AnswerComposer, NO_SOURCES_ANSWER};
pub use pipeline::{QueryOutcome, QueryPipeline};
pub use scorer::{AttributedChunk, RelevanceScorer, ScoredChunk};
