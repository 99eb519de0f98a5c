//! Axum route handlers for the upload API.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::{content_type_for, has_allowed_extension, StoredFile};

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// POST /api/uploads
///
/// Multipart form with a `file` part and an optional `file_type` text part.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredFile>), AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut file_type = "image".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;
                file = Some((name, bytes.to_vec()));
            }
            Some("file_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Malformed upload: {e}")))?;
                if !value.trim().is_empty() {
                    file_type = value.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let Some((name, bytes)) = file else {
        return Err(AppError::BadRequest("No file part in the request".to_string()));
    };
    if name.is_empty() {
        return Err(AppError::BadRequest("No file selected".to_string()));
    }
    if !has_allowed_extension(&name) {
        return Err(AppError::BadRequest(
            "File type not allowed; use png, jpg or jpeg".to_string(),
        ));
    }

    let stored = state.storage.store_file(bytes, &name, &file_type).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/uploads?location=
pub async fn handle_get_upload(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .storage
        .get_file(&query.location)
        .await
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&query.location))], bytes))
}

/// DELETE /api/uploads?location=
pub async fn handle_delete_upload(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.storage.delete_file(&query.location).await;
    if !deleted {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    Ok(Json(DeleteResponse { deleted }))
}
