//! docuchat: document Q&A with background ingestion and cited answers
//!
//! Uploaded files are extracted and chunked by a background worker, documents
//! are grouped into named chat sessions, and questions are answered by
//! lexical retrieval over the stored chunks, with per-answer source
//! citations.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod query;
pub mod server;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Document, DocumentStatus, FileType},
    session::{ChatMessage, ChatSession, MessageRole, SourceCitation},
};
