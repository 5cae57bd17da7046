//! Source document text extraction.

use thiserror::Error;
use tracing::{debug, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("File is not a PDF document")]
    NotPdf,

    #[error("Could not read PDF: {0}")]
    Unreadable(String),

    #[error("No text could be extracted from the PDF")]
    Empty,
}

/// Accepts an upload when either the file name or the content says PDF.
pub fn looks_like_pdf(file_name: Option<&str>, bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
        || file_name.is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"))
}

/// Extracts the text layer of a PDF. Blocking; run it off the async runtime.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(DocumentError::NotPdf);
    }
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        warn!("PDF extraction failed: {e}");
        DocumentError::Unreadable(e.to_string())
    })?;

    if text.trim().is_empty() {
        return Err(DocumentError::Empty);
    }
    debug!("Extracted {} chars from PDF", text.chars().count());
    Ok(text)
}

/// Runs `extract_text` on the blocking pool. A panic inside the PDF parser
/// surfaces as `Unreadable`.
pub async fn extract_text_blocking(bytes: bytes::Bytes) -> Result<String, DocumentError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| DocumentError::Unreadable(format!("PDF parser aborted: {e}")))?
}
