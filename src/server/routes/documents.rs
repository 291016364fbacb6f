//! Document management endpoints

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::document::{Document, FileType};
use crate::types::response::{
    ChunkListResponse, DocumentContentResponse, DocumentListResponse, UploadResponse,
};

/// GET /api/documents - List all documents
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let documents = state.db().list_documents()?;
    let total_count = documents.len();

    Ok(Json(DocumentListResponse {
        documents,
        total_count,
    }))
}

/// POST /api/documents/upload - Upload a document and queue its ingestion
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("document") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::InvalidRequest("Uploaded file has no filename".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::InvalidRequest(format!("Failed to read upload: {}", e)))?;

        upload = Some((filename, data.to_vec()));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| Error::InvalidRequest("No file uploaded".to_string()))?;

    tracing::info!("Uploading document: {} ({} bytes)", filename, data.len());

    let file_type = FileType::from_filename(&filename);
    let stored_path = state.files().save(&filename, &data).await?;
    let document = Document::new(filename, file_type, data.len() as u64, stored_path);
    state.db().insert_document(&document)?;

    // Fire and forget: the handle is dropped, the caller polls the
    // document's status field instead.
    let _handle = state.ingest_queue().submit(document.id).await?;

    Ok(Json(UploadResponse {
        message: "Document uploaded successfully".to_string(),
        document,
    }))
}

/// GET /api/documents/:id - Get a document record
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>> {
    let doc = state
        .db()
        .get_document(&id)?
        .ok_or_else(|| Error::not_found(format!("document {}", id)))?;

    Ok(Json(doc))
}

/// GET /api/documents/:id/content - Get a document's extracted text
pub async fn get_document_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentContentResponse>> {
    let doc = state
        .db()
        .get_document(&id)?
        .ok_or_else(|| Error::not_found(format!("document {}", id)))?;

    Ok(Json(DocumentContentResponse {
        id: doc.id,
        name: doc.name,
        content: doc.content.unwrap_or_default(),
    }))
}

/// GET /api/documents/:id/chunks - List a document's chunks
pub async fn get_document_chunks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChunkListResponse>> {
    state
        .db()
        .get_document(&id)?
        .ok_or_else(|| Error::not_found(format!("document {}", id)))?;

    let chunks = state.db().chunks_for_document(&id)?;
    let total_count = chunks.len();

    Ok(Json(ChunkListResponse {
        chunks,
        total_count,
    }))
}

/// DELETE /api/documents/:id - Delete a document, its chunks, and its file
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let doc = state
        .db()
        .get_document(&id)?
        .ok_or_else(|| Error::not_found(format!("document {}", id)))?;

    let deleted_chunks = state.db().delete_chunks_for_document(&id)?;
    state.files().delete(&doc.stored_path).await?;
    state.db().delete_document(&id)?;

    tracing::info!("Deleted document '{}' and {} chunks", doc.name, deleted_chunks);

    Ok(Json(serde_json::json!({
        "success": true,
        "document_id": id,
        "deleted_chunks": deleted_chunks,
    })))
}
