//! Turns an uploaded file into model input: plain text for PDFs, base64 for
//! images. Pure transforms, no I/O.

pub mod pdf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crate::errors::LabsightError;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Pdf,
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedContent {
    /// Text layer of a PDF. May be empty for scanned documents.
    Text(String),
    /// Base64 payload of an image, with its media type.
    Image { media_type: String, data: String },
}

/// Lowercased media type without parameters, e.g. `image/png; q=1` -> `image/png`.
pub fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

pub fn classify(media_type: &str) -> Result<MediaKind, LabsightError> {
    let essence = essence(media_type);
    if essence == PDF_MEDIA_TYPE {
        Ok(MediaKind::Pdf)
    } else if essence.starts_with("image/") && essence.len() > "image/".len() {
        Ok(MediaKind::Image)
    } else {
        Err(LabsightError::UnsupportedMediaType(media_type.to_string()))
    }
}

pub fn extract(bytes: &[u8], media_type: &str) -> Result<ExtractedContent, LabsightError> {
    match classify(media_type)? {
        MediaKind::Pdf => pdf::extract_text(bytes).map(ExtractedContent::Text),
        MediaKind::Image => Ok(ExtractedContent::Image {
            media_type: essence(media_type),
            data: STANDARD.encode(bytes),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_pdf() {
        assert_eq!(classify("application/pdf").unwrap(), MediaKind::Pdf);
        assert_eq!(classify("Application/PDF").unwrap(), MediaKind::Pdf);
    }

    #[test]
    fn test_classify_images() {
        assert_eq!(classify("image/png").unwrap(), MediaKind::Image);
        assert_eq!(classify("image/jpeg; charset=binary").unwrap(), MediaKind::Image);
    }

    #[test]
    fn test_classify_unsupported() {
        for media_type in ["text/plain", "application/json", "image/", "", "application/pdfx"] {
            let err = classify(media_type).unwrap_err();
            assert!(matches!(err, LabsightError::UnsupportedMediaType(_)), "{media_type}");
        }
    }

    #[test]
    fn test_extract_image_base64() {
        let content = extract(b"\x89PNG fake", "image/png").unwrap();
        assert_eq!(
            content,
            ExtractedContent::Image {
                media_type: "image/png".into(),
                data: "iVBORyBmYWtl".into(),
            }
        );
    }

    #[test]
    fn test_extract_rejects_before_reading_bytes() {
        let err = extract(b"%PDF-1.4", "text/csv").unwrap_err();
        assert!(matches!(err, LabsightError::UnsupportedMediaType(t) if t == "text/csv"));
    }

    #[test]
    fn test_extract_malformed_pdf_is_an_error() {
        let err = extract(b"not a pdf", "application/pdf").unwrap_err();
        assert!(matches!(err, LabsightError::Extraction(_)));
    }
}
