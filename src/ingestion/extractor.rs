//! Text extraction for supported document formats

use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::FileType;

/// pdf-extract can hang on documents with unusual fonts; bail out after this
/// long and fall back to lopdf.
const PDF_EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Extracted text plus whatever structure the decoder could recover
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Plain text content
    pub content: String,
    /// Page count, when the format has pages
    pub page_count: Option<u32>,
}

/// Converts stored file bytes into plain text. Pure: no stored entity is
/// touched here.
pub struct TextExtractor;

impl TextExtractor {
    /// Extract text from a file's bytes according to its declared type
    pub fn extract(name: &str, file_type: FileType, data: &[u8]) -> Result<ExtractedText> {
        match file_type {
            FileType::Pdf => Self::extract_pdf(name, data),
            FileType::Docx | FileType::Doc => Self::extract_docx(name, data),
            FileType::Txt | FileType::Markdown => Ok(Self::extract_text(data)),
            FileType::Unknown => {
                let ext = Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown");
                Err(Error::UnsupportedFormat(ext.to_string()))
            }
        }
    }

    /// Extract text from a PDF
    fn extract_pdf(name: &str, data: &[u8]) -> Result<ExtractedText> {
        let raw = Self::pdf_text_with_timeout(name, data)?;

        // Drop null bytes and collapse the whitespace pdf-extract leaves
        // around line breaks.
        let content = raw
            .replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        if content.is_empty() {
            return Err(Error::extraction(
                name,
                "no text content could be extracted; the PDF may be image-based",
            ));
        }

        let page_count = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);

        Ok(ExtractedText {
            content,
            page_count,
        })
    }

    /// Run pdf-extract on a helper thread so a hung decode cannot stall the
    /// worker; on failure or timeout, fall back to lopdf.
    fn pdf_text_with_timeout(name: &str, data: &[u8]) -> Result<String> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let _ = tx.send(pdf_extract::extract_text_from_mem(&data_vec));
        });

        match rx.recv_timeout(Duration::from_secs(PDF_EXTRACT_TIMEOUT_SECS)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed for '{}': {}, trying lopdf fallback", name, e);
                Self::pdf_text_fallback(name, data)
            }
            Err(_) => {
                tracing::warn!(
                    "PDF extraction for '{}' exceeded {}s, trying lopdf fallback",
                    name,
                    PDF_EXTRACT_TIMEOUT_SECS
                );
                Self::pdf_text_fallback(name, data)
            }
        }
    }

    fn pdf_text_fallback(name: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction(name, format!("failed to load PDF: {}", e)))?;

        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        doc.extract_text(&pages)
            .map_err(|e| Error::extraction(name, format!("failed to extract PDF text: {}", e)))
    }

    /// Extract text from a Word document
    fn extract_docx(name: &str, data: &[u8]) -> Result<ExtractedText> {
        let docx = docx_rs::read_docx(data).map_err(|e| Error::extraction(name, e.to_string()))?;

        let mut content = String::new();
        for child in docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                for child in paragraph.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(text) = child {
                                content.push_str(&text.text);
                            }
                        }
                    }
                }
                content.push('\n');
            }
        }

        Ok(ExtractedText {
            content,
            page_count: None,
        })
    }

    /// Plain text and markdown pass through
    fn extract_text(data: &[u8]) -> ExtractedText {
        ExtractedText {
            content: String::from_utf8_lossy(data).to_string(),
            page_count: None,
        }
    }
}

/// Hash extracted content for the document record
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        let extracted =
            TextExtractor::extract("notes.txt", FileType::Txt, b"The sky is blue.").unwrap();
        assert_eq!(extracted.content, "The sky is blue.");
        assert_eq!(extracted.page_count, None);
    }

    #[test]
    fn markdown_passes_through() {
        let extracted =
            TextExtractor::extract("notes.md", FileType::Markdown, b"# Title\n\nBody.").unwrap();
        assert!(extracted.content.contains("Body."));
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = TextExtractor::extract("archive.zip", FileType::Unknown, b"PK").unwrap_err();
        match err {
            Error::UnsupportedFormat(ext) => assert_eq!(ext, "zip"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn malformed_pdf_fails_extraction() {
        let err =
            TextExtractor::extract("bad.pdf", FileType::Pdf, b"this is not a pdf").unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed { .. }));
    }

    #[test]
    fn malformed_docx_fails_extraction() {
        let err =
            TextExtractor::extract("bad.docx", FileType::Docx, b"this is not a zip").unwrap_err();
        assert!(matches!(err, Error::ExtractionFailed { .. }));
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
        assert_eq!(hash_content("abc").len(), 64);
    }
}
