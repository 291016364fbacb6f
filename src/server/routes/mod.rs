//! API routes for the document service

pub mod documents;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Document management
        .route("/documents", get(documents::list_documents))
        .route(
            "/documents/upload",
            post(documents::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/documents/:id", get(documents::get_document))
        .route("/documents/:id", delete(documents::delete_document))
        .route("/documents/:id/content", get(documents::get_document_content))
        .route("/documents/:id/chunks", get(documents::get_document_chunks))
        // Chat sessions
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:id", delete(sessions::delete_session))
        .route("/sessions/:id/messages", get(sessions::list_messages))
        .route("/sessions/:id/messages", post(sessions::send_message))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docuchat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document Q&A with background ingestion and cited answers",
        "endpoints": {
            "POST /api/documents/upload": "Upload a document for background ingestion",
            "GET /api/documents": "List all documents",
            "GET /api/documents/:id": "Get a document (poll status here)",
            "GET /api/documents/:id/content": "Get a document's extracted text",
            "GET /api/documents/:id/chunks": "List a document's chunks",
            "DELETE /api/documents/:id": "Delete a document, its chunks, and its file",
            "GET /api/sessions": "List chat sessions",
            "POST /api/sessions": "Create a chat session over a document set",
            "GET /api/sessions/:id/messages": "List a session's messages",
            "POST /api/sessions/:id/messages": "Ask a question in a session",
            "DELETE /api/sessions/:id": "Delete a session and its messages"
        }
    }))
}
