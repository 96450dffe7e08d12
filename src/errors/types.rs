use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabsightError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Unsupported file type '{0}'. Please upload a PDF or image.")]
    UnsupportedMediaType(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Content extraction failed: {0}")]
    Extraction(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LabsightError {
    /// True for errors caused by the request itself rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LabsightError::MissingFile
                | LabsightError::UnsupportedMediaType(_)
                | LabsightError::FileTooLarge { .. }
                | LabsightError::PayloadTooLarge(_)
                | LabsightError::InvalidUpload(_)
                | LabsightError::NotFound(_)
        )
    }
}
