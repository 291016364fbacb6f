//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// Old Microsoft Word document (.doc)
    Doc,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a filename
    pub fn from_filename(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or("");
        Self::from_extension(ext)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Stable string form for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Txt => "txt",
            Self::Markdown => "markdown",
            Self::Unknown => "unknown",
        }
    }

    /// Parse the stored string form
    pub fn parse(value: &str) -> Self {
        match value {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "txt" => Self::Txt,
            "markdown" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Doc => "Word Document (.doc)",
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Unknown => "Unknown",
        }
    }
}

/// Processing status of a document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Ingestion is queued or in flight
    Processing,
    /// Chunks are persisted and queryable
    Processed,
    /// Ingestion failed; terminal
    Error,
}

impl DocumentStatus {
    /// Stable string form for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Error => "error",
        }
    }

    /// Parse the stored string form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "processing" => Some(Self::Processing),
            "processed" => Some(Self::Processed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

// Coarse checkpoints reported while a document moves through ingestion.
const PROGRESS_STARTED: u8 = 10;
const PROGRESS_EXTRACTED: u8 = 50;
const PROGRESS_CHUNKED: u8 = 80;
const PROGRESS_COMPLETE: u8 = 100;

/// An uploaded document and its processing state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Original filename as uploaded by the user
    pub name: String,
    /// File type
    pub file_type: FileType,
    /// File size in bytes
    pub file_size: u64,
    /// Stored filename under the upload directory
    pub stored_path: String,
    /// Processing status
    pub status: DocumentStatus,
    /// Coarse progress checkpoint, 0-100
    pub processing_progress: u8,
    /// Error message when status is `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Number of chunks produced by ingestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<u32>,
    /// Full extracted text (may be large; populated during ingestion)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    /// Hash of the extracted text
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content_hash: Option<String>,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document record for an upload
    pub fn new(name: String, file_type: FileType, file_size: u64, stored_path: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            file_type,
            file_size,
            stored_path,
            status: DocumentStatus::Processing,
            processing_progress: 0,
            error_message: None,
            chunk_count: None,
            content: None,
            content_hash: None,
            uploaded_at: Utc::now(),
        }
    }

    /// Snapshot after ingestion picks the document up
    pub fn begin_processing(mut self) -> Self {
        self.status = DocumentStatus::Processing;
        self.processing_progress = PROGRESS_STARTED;
        self
    }

    /// Snapshot after text extraction
    pub fn with_extracted(mut self, content: String, content_hash: String) -> Self {
        self.content = Some(content);
        self.content_hash = Some(content_hash);
        self.processing_progress = PROGRESS_EXTRACTED;
        self
    }

    /// Snapshot after chunking, before chunks are persisted
    pub fn with_chunked(mut self) -> Self {
        self.processing_progress = PROGRESS_CHUNKED;
        self
    }

    /// Terminal snapshot: chunks are persisted and the document is queryable
    pub fn into_processed(mut self, chunk_count: u32) -> Self {
        self.status = DocumentStatus::Processed;
        self.processing_progress = PROGRESS_COMPLETE;
        self.chunk_count = Some(chunk_count);
        self.error_message = None;
        self
    }

    /// Terminal snapshot: ingestion failed
    pub fn into_error(mut self, message: impl Into<String>) -> Self {
        self.status = DocumentStatus::Error;
        self.error_message = Some(message.into());
        self
    }
}

/// A chunk of a document's extracted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Owning document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Zero-based index within the document
    pub chunk_index: u32,
    /// Page number, when the source format has pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    /// Section label, when one was detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(document_id: Uuid, content: String, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content,
            chunk_index,
            page_number: None,
            section: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_detection() {
        assert_eq!(FileType::from_filename("report.PDF"), FileType::Pdf);
        assert_eq!(FileType::from_filename("notes.md"), FileType::Markdown);
        assert_eq!(FileType::from_filename("a.b.docx"), FileType::Docx);
        assert_eq!(FileType::from_filename("archive.zip"), FileType::Unknown);
        assert_eq!(FileType::from_filename("no_extension"), FileType::Unknown);
        assert!(!FileType::Unknown.is_supported());
    }

    #[test]
    fn file_type_storage_roundtrip() {
        for ft in [
            FileType::Pdf,
            FileType::Docx,
            FileType::Doc,
            FileType::Txt,
            FileType::Markdown,
        ] {
            assert_eq!(FileType::parse(ft.as_str()), ft);
        }
    }

    #[test]
    fn status_transitions_advance_progress() {
        let doc = Document::new("a.txt".into(), FileType::Txt, 10, "stored.txt".into());
        assert_eq!(doc.status, DocumentStatus::Processing);
        assert_eq!(doc.processing_progress, 0);

        let doc = doc.begin_processing();
        assert_eq!(doc.processing_progress, 10);

        let doc = doc.with_extracted("hello".into(), "hash".into());
        assert_eq!(doc.processing_progress, 50);
        assert_eq!(doc.content.as_deref(), Some("hello"));

        let doc = doc.with_chunked();
        assert_eq!(doc.processing_progress, 80);

        let doc = doc.into_processed(4);
        assert_eq!(doc.status, DocumentStatus::Processed);
        assert_eq!(doc.processing_progress, 100);
        assert_eq!(doc.chunk_count, Some(4));
    }

    #[test]
    fn error_is_recorded_with_message() {
        let doc = Document::new("a.txt".into(), FileType::Txt, 10, "stored.txt".into())
            .begin_processing()
            .into_error("boom");
        assert_eq!(doc.status, DocumentStatus::Error);
        assert_eq!(doc.error_message.as_deref(), Some("boom"));
    }
}
