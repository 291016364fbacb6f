//! Core types: documents, chunks, sessions, and messages

pub mod document;
pub mod response;
pub mod session;

pub use document::{Chunk, Document, DocumentStatus, FileType};
pub use session::{ChatMessage, ChatSession, MessageRole, SourceCitation};
