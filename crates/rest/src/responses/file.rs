//! File-style backup downloads.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use hub_persistence::types::Backup;

use crate::error::{RestError, RestResult};
use crate::middleware::BodyFormat;

/// Builds a `200 OK` download of a backup document.
///
/// The body is the JSON document served as `application/octet-stream`, with
/// a `Content-Disposition` naming it `<label>-backup.json`.
pub fn file_response(label: &str, backup: &Backup) -> RestResult<Response> {
    let bytes = serde_json::to_vec(backup).map_err(|e| RestError::InternalError {
        message: format!("Failed to serialize backup: {}", e),
    })?;

    let headers = [
        (
            header::CONTENT_TYPE,
            BodyFormat::OctetStream.mime_type().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}-backup.json\"", label),
        ),
    ];
    Ok((StatusCode::OK, headers, bytes).into_response())
}
