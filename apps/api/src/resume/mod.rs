//! Resume text extraction for uploaded files.
//!
//! PDFs go through `pdf-extract` on the blocking pool with a timeout; anything
//! else is read as UTF-8. Every failure collapses to an empty string so the
//! composer can report "no usable resume" in one place.

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound for a single PDF parse.
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PDF extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("PDF extraction task aborted: {0}")]
    Aborted(String),

    #[error("Resume is not valid UTF-8 text")]
    NotUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Text,
}

impl ResumeFormat {
    /// Classified by extension only; content sniffing is not attempted.
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_lowercase().ends_with(".pdf") {
            ResumeFormat::Pdf
        } else {
            ResumeFormat::Text
        }
    }
}

/// Extracts plain text from an uploaded resume. Returns an empty string on failure.
pub async fn extract_resume_text(filename: &str, data: Bytes) -> String {
    let format = ResumeFormat::from_filename(filename);
    let result = match format {
        ResumeFormat::Pdf => extract_pdf(data).await,
        ResumeFormat::Text => decode_text(&data),
    };

    match result {
        Ok(text) => {
            let text = normalize(&text);
            debug!(filename, chars = text.len(), "Resume text extracted");
            if text.is_empty() {
                warn!(filename, "Resume text is empty after extraction");
            }
            text
        }
        Err(e) => {
            warn!(filename, "Could not read resume: {e}");
            String::new()
        }
    }
}

async fn extract_pdf(data: Bytes) -> Result<String, ResumeError> {
    parse_blocking(PDF_EXTRACT_TIMEOUT, move || {
        pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
    })
    .await
}

/// Runs a CPU-bound parser on the blocking pool, giving up after `limit`.
async fn parse_blocking<F>(limit: Duration, parse: F) -> Result<String, ResumeError>
where
    F: FnOnce() -> Result<String, String> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(parse);

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(Ok(text))) => Ok(text),
        Ok(Ok(Err(e))) => Err(ResumeError::Pdf(e)),
        Ok(Err(join_err)) => Err(ResumeError::Aborted(join_err.to_string())),
        Err(_) => Err(ResumeError::Timeout(limit)),
    }
}

fn decode_text(data: &[u8]) -> Result<String, ResumeError> {
    let text = std::str::from_utf8(data).map_err(|_| ResumeError::NotUtf8)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

/// Drops NUL bytes, trims each line, and removes blank lines.
fn normalize(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
