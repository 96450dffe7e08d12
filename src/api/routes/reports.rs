use axum::{
    extract::{multipart::MultipartError, multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use crate::api::AppState;
use crate::errors::LabsightError;
use crate::models::{Report, UploadedFile};

/// Multipart field carrying the uploaded document.
pub const REPORT_FIELD: &str = "report";

const NOT_FOUND: &str = "Report not found";

pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<Report>>, LabsightError> {
    state.db.list_reports().map(Json)
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Report>, LabsightError> {
    // A non-numeric id can never match a row.
    let id: i64 = id.parse().map_err(|_| LabsightError::NotFound(NOT_FOUND.into()))?;
    match state.db.get_report(id)? {
        Some(report) => Ok(Json(report)),
        None => Err(LabsightError::NotFound(NOT_FOUND.into())),
    }
}

pub async fn upload_report(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Report>), LabsightError> {
    // Anything that is not a multipart body carries no file.
    let upload = match multipart {
        Ok(mut multipart) => read_report_field(&mut multipart).await?,
        Err(_) => None,
    };

    let report = state.analyzer.analyze(upload).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// The single file sent as `report`. Plain text fields and other parts are
/// ignored; an empty file input counts as no file.
async fn read_report_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, LabsightError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(REPORT_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if upload.is_some() {
            return Err(LabsightError::InvalidUpload("Only one file may be uploaded per request".into()));
        }

        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        upload = Some(UploadedFile::new(Some(file_name), media_type, bytes.to_vec()));
    }

    Ok(upload)
}

fn multipart_error(e: MultipartError) -> LabsightError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        LabsightError::PayloadTooLarge(e.body_text())
    } else {
        LabsightError::InvalidUpload(e.body_text())
    }
}
