//! Folder permission handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_entity::permission::FolderPermission;

use crate::dto::request::UpsertPermissionRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, Path, ValidatedJson};
use crate::state::AppState;

/// POST /api/permissions
///
/// 201 when the grant is new, 200 when an existing one was changed.
pub async fn upsert_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpsertPermissionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FolderPermission>>), AppError> {
    let (grant, created) = state
        .permission_service
        .upsert(&auth, req.folder_id, req.user_id, req.access_level)
        .await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::ok(grant))))
}

/// GET /api/permissions/{folder_id}/{user_id}
pub async fn get_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((folder_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<FolderPermission>>, AppError> {
    let grant = state
        .permission_service
        .get(&auth, folder_id, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(grant)))
}

/// DELETE /api/permissions/{folder_id}/{user_id}
pub async fn delete_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((folder_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .permission_service
        .revoke(&auth, folder_id, user_id)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Permission revoked",
    ))))
}
