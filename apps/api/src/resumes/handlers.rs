use axum::{
    extract::{multipart::MultipartError, multipart::MultipartRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::resumes::naming::{content_type_for, is_servable_name, storage_name};
use crate::state::AppState;

/// Upload ceiling for a single résumé.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit for the upload route: the file plus multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_RESUME_BYTES + 64 * 1024;

pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_path: String,
}

/// POST /api/jobs/upload-resume
///
/// Reads the `resume` part in chunks and stops as soon as it exceeds the ceiling,
/// so oversized uploads never reach storage.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let original_name = field.file_name().map(String::from);

        let mut buf = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if buf.len() + chunk.len() > MAX_RESUME_BYTES {
                return Err(too_large());
            }
            buf.extend_from_slice(&chunk);
        }

        let name = storage_name(original_name.as_deref());
        let size = buf.len();
        state
            .resumes
            .put(&name, buf.freeze(), content_type_for(&name))
            .await?;
        info!("Stored résumé {name} ({size} bytes)");

        return Ok(Json(UploadResponse {
            message: "Resume uploaded successfully".to_string(),
            file_path: name,
        }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// GET /api/jobs/resume/:filename
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound("Resume file not found".to_string());
    if !is_servable_name(&filename) {
        return Err(not_found());
    }
    let data = state.resumes.get(&filename).await?.ok_or_else(not_found)?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], data).into_response())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(err.body_text())
    }
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "Resume exceeds the {} MiB limit",
        MAX_RESUME_BYTES / (1024 * 1024)
    ))
}
