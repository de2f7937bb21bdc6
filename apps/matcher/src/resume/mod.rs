//! Resume acquisition: plain text, or a base64 file that is PDF or text.
//!
//! Acquisition never fails a request by itself. Any decoding problem is
//! logged and reported as "no resume", which the handler turns into a 400.

use base64::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Resume fields shared by `/match-jobs` and `/explain-match`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumePayload {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub file_base64: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unsupported mime type {0:?}")]
    UnsupportedMime(String),

    #[error("text file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("could not extract text from PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Substring match, checked in order: "pdf" wins over "text".
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        let mime = mime_type.to_ascii_lowercase();
        if mime.contains("pdf") {
            Some(Self::Pdf)
        } else if mime.contains("text") {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// Decodes a base64 file and extracts its text.
pub fn decode_file(file_base64: &str, mime_type: &str) -> Result<String, AcquisitionError> {
    let kind = DocumentKind::from_mime(mime_type)
        .ok_or_else(|| AcquisitionError::UnsupportedMime(mime_type.to_string()))?;
    let cleaned: String = file_base64
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = BASE64_STANDARD.decode(cleaned)?;
    match kind {
        DocumentKind::Text => Ok(String::from_utf8(bytes)?),
        DocumentKind::Pdf => extract_pdf_text(&bytes),
    }
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, AcquisitionError> {
    // pdf-extract panics on some malformed documents.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AcquisitionError::Pdf(e.to_string())),
        Err(_) => Err(AcquisitionError::Pdf("parser panicked".to_string())),
    }
}

/// Resume text from a payload. Non-empty `resume_text` wins; otherwise the
/// file is decoded. Absent input, decoding failures and empty documents all
/// give `None`.
pub fn resume_text(payload: &ResumePayload) -> Option<String> {
    if let Some(text) = payload.resume_text.as_deref().filter(|t| !t.is_empty()) {
        return Some(text.to_string());
    }

    let file = payload.file_base64.as_deref().filter(|f| !f.is_empty())?;
    let mime_type = payload.mime_type.as_deref().unwrap_or_default();
    match decode_file(file, mime_type) {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            warn!(mime_type, error = %e, "Failed to read resume file");
            None
        }
    }
}
