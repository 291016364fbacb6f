//! JSON response envelopes for the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Chunk, Document};
use super::session::{ChatMessage, ChatSession};

/// Response for listing documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    /// Documents, newest first
    pub documents: Vec<Document>,
    /// Total count
    pub total_count: usize,
}

/// Response from a document upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    /// The created document; poll its status for ingestion progress
    pub document: Document,
}

/// Extracted text of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentContentResponse {
    pub id: Uuid,
    pub name: String,
    pub content: String,
}

/// Response for listing a document's chunks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkListResponse {
    /// Chunks ordered by index
    pub chunks: Vec<Chunk>,
    pub total_count: usize,
}

/// Response for listing chat sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// Sessions, most recent activity first
    pub sessions: Vec<ChatSession>,
    pub total_count: usize,
}

/// Response for listing a session's messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListResponse {
    /// Messages, oldest first
    pub messages: Vec<ChatMessage>,
    pub total_count: usize,
}

/// Response from sending a message: the persisted exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub user_message: ChatMessage,
    pub assistant_message: ChatMessage,
}
