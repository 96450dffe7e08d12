use std::panic;
use tracing::debug;
use crate::errors::LabsightError;

/// Extract the text layer of a PDF.
///
/// Image-only PDFs yield an empty string rather than an error. The parser
/// can panic on some damaged files, so panics are reported as extraction
/// failures as well.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, LabsightError> {
    let result = panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf_bytes))
        .map_err(|_| LabsightError::Extraction("PDF parser aborted on malformed input".into()))?;

    let text = result.map_err(|e| LabsightError::Extraction(format!("PDF parsing failed: {}", e)))?;
    debug!(bytes = pdf_bytes.len(), chars = text.len(), "Extracted PDF text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_returns_error() {
        assert!(matches!(extract_text(b"not a pdf"), Err(LabsightError::Extraction(_))));
    }

    #[test]
    fn empty_input_returns_error() {
        assert!(matches!(extract_text(b""), Err(LabsightError::Extraction(_))));
    }
}
