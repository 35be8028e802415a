use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Cheap signature check before handing bytes to the parser.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts the text layer of an uploaded PDF on a blocking thread.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    if !looks_like_pdf(&bytes) {
        return Err(AppError::Validation(
            "Uploaded file is not a PDF".to_string(),
        ));
    }

    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                AppError::Pdf("PDF parser failed on this document".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
            }
        })?
        .map_err(|e| AppError::Pdf(format!("Could not read PDF: {e}")))?;

    debug!("Extracted {} chars of text from {} byte PDF", text.len(), size);

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the PDF".to_string(),
        ));
    }
    Ok(text)
}
