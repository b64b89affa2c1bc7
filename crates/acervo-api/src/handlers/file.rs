//! File handlers: upload, metadata, download.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::types::pagination::PageResponse;
use acervo_entity::file::File;
use acervo_service::file::{Download, FileDetails, FileView, UploadedPart};

use crate::dto::request::{MoveFileRequest, UpdateFileRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, PaginationParams, Path, Query, ValidatedJson};
use crate::state::AppState;

/// POST /api/files/upload
///
/// Multipart body: one `folder_id` field and one or more `files` parts.
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<File>>>), AppError> {
    let mut folder_id = None;
    let mut parts = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("folder_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid folder_id: {e}")))?;
                let id = text
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|_| AppError::validation("Invalid folder_id"))?;
                folder_id = Some(id);
            }
            Some("files") => {
                let original_name = field.file_name().unwrap_or("file").to_string();
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;
                parts.push(UploadedPart {
                    original_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let folder_id = folder_id.ok_or_else(|| AppError::validation("folder_id is required"))?;
    let files = state.upload_service.upload(&auth, folder_id, parts).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(files))))
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<FileView>>>, AppError> {
    let page = state
        .file_service
        .list_files(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileDetails>>, AppError> {
    let file = state.file_service.get_file(&auth, id).await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let download = state.download_service.download(&auth, id).await?;
    download_response(download)
}

/// Streams a download with its type and attachment name.
pub(crate) fn download_response(download: Download) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.file.mime_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&download.file.display_name),
        )
        .body(Body::from_stream(download.body))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// PUT /api/files/{id}
pub async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateFileRequest>,
) -> Result<Json<ApiResponse<File>>, AppError> {
    let file = state
        .file_service
        .rename_file(&auth, id, &req.display_name)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// PUT /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<MoveFileRequest>,
) -> Result<Json<ApiResponse<File>>, AppError> {
    let file = state
        .file_service
        .move_file(&auth, id, req.new_folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}

/// DELETE /api/files/{id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.file_service.delete_file(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("File deleted"))))
}

/// `attachment` disposition; quotes and control characters in the name
/// are replaced so the header stays well-formed.
fn content_disposition(display_name: &str) -> String {
    let safe: String = display_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("TCC Final.pdf"),
            "attachment; filename=\"TCC Final.pdf\""
        );
        assert_eq!(
            content_disposition("a\"b\r\n.pdf"),
            "attachment; filename=\"a_b__.pdf\""
        );
    }
}
