//! Chat session and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a chat message author
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Stable string form for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parse the stored string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// A named conversation scoped to a set of documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session ID
    pub id: Uuid,
    /// User-assigned name
    pub name: String,
    /// Documents this session may retrieve from (non-empty)
    pub document_ids: Vec<Uuid>,
    /// Text of the most recent question
    pub last_message: String,
    /// Timestamp of the most recent exchange
    pub last_message_at: DateTime<Utc>,
    /// Running message count (user and assistant messages)
    pub message_count: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create a new session over the given documents
    pub fn new(name: String, document_ids: Vec<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            document_ids,
            last_message: String::new(),
            last_message_at: now,
            message_count: 0,
            created_at: now,
        }
    }
}

/// A source citation attached to an assistant message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceCitation {
    /// Name of the cited document
    pub document: String,
    /// Page number, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Bounded excerpt of the cited chunk
    pub excerpt: String,
    /// Relevance score in [0, 1]
    pub relevance: f32,
}

/// A message in a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// Owning session ID
    pub session_id: Uuid,
    /// Author role
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// Source citations (assistant messages only)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sources: Vec<SourceCitation>,
    /// Time taken to produce the answer (assistant messages only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(session_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role: MessageRole::User,
            content,
            sources: Vec::new(),
            response_time_ms: None,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message with its citations and timing
    pub fn assistant(
        session_id: Uuid,
        content: String,
        sources: Vec<SourceCitation>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role: MessageRole::Assistant,
            content,
            sources,
            response_time_ms: Some(response_time_ms),
            created_at: Utc::now(),
        }
    }
}
