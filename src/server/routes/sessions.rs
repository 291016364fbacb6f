//! Chat session and message endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::response::{MessageListResponse, SendMessageResponse, SessionListResponse};
use crate::types::session::{ChatMessage, ChatSession};

/// Request to create a chat session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
    pub document_ids: Vec<Uuid>,
}

/// Request to ask a question in a session
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub question: String,
}

/// GET /api/sessions - List all chat sessions
pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<SessionListResponse>> {
    let sessions = state.db().list_sessions()?;
    let total_count = sessions.len();

    Ok(Json(SessionListResponse {
        sessions,
        total_count,
    }))
}

/// POST /api/sessions - Create a chat session over a document set
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<ChatSession>> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidRequest("Session name is required".to_string()));
    }
    if request.document_ids.is_empty() {
        return Err(Error::InvalidRequest(
            "At least one document id is required".to_string(),
        ));
    }

    let existing = state.db().count_existing_documents(&request.document_ids)?;
    if existing != request.document_ids.len() {
        return Err(Error::InvalidRequest(
            "One or more documents not found".to_string(),
        ));
    }

    let session = ChatSession::new(name.to_string(), request.document_ids);
    state.db().insert_session(&session)?;

    tracing::info!(
        "Created chat session '{}' over {} document(s)",
        session.name,
        session.document_ids.len()
    );

    Ok(Json(session))
}

/// DELETE /api/sessions/:id - Delete a session and its messages
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    if !state.db().delete_session(&id)? {
        return Err(Error::not_found(format!("session {}", id)));
    }

    tracing::info!("Deleted chat session {}", id);

    Ok(Json(serde_json::json!({
        "success": true,
        "session_id": id,
    })))
}

/// GET /api/sessions/:id/messages - List a session's messages
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageListResponse>> {
    state
        .db()
        .get_session(&id)?
        .ok_or_else(|| Error::not_found(format!("session {}", id)))?;

    let messages = state.db().messages_for_session(&id)?;
    let total_count = messages.len();

    Ok(Json(MessageListResponse {
        messages,
        total_count,
    }))
}

/// POST /api/sessions/:id/messages - Ask a question in a session
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>> {
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(Error::InvalidRequest("Question is required".to_string()));
    }

    let session = state
        .db()
        .get_session(&id)?
        .ok_or_else(|| Error::not_found(format!("session {}", id)))?;

    tracing::info!("Question in session '{}': \"{}\"", session.name, question);

    let user_message = ChatMessage::user(session.id, question.clone());
    state.db().insert_message(&user_message)?;

    let outcome = state
        .query_pipeline()
        .answer(&question, &session.document_ids)?;

    let assistant_message = ChatMessage::assistant(
        session.id,
        outcome.answer,
        outcome.sources,
        outcome.response_time_ms,
    );
    state.db().insert_message(&assistant_message)?;

    state
        .db()
        .touch_session(&session.id, &question, assistant_message.created_at, 2)?;

    Ok(Json(SendMessageResponse {
        user_message,
        assistant_message,
    }))
}
