use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::{error, warn};
use crate::errors::LabsightError;

impl IntoResponse for LabsightError {
    fn into_response(self) -> axum::response::Response {
        // Client errors carry their own message; server errors stay generic.
        let (status, message) = if self.is_client_error() {
            let status = match &self {
                LabsightError::FileTooLarge { .. } | LabsightError::PayloadTooLarge(_) => {
                    StatusCode::PAYLOAD_TOO_LARGE
                }
                LabsightError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            };
            warn!(error = %self, status = status.as_u16(), "Request rejected");
            (status, self.to_string())
        } else {
            error!(error = %self, "Request failed");
            let message = match &self {
                LabsightError::Extraction(_) | LabsightError::AnalysisFailed(_) => "Error processing report",
                _ => "Internal Server Error",
            };
            (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
        };

        (status, Json(json!({"message": message}))).into_response()
    }
}
