//! Folder handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_entity::folder::Folder;
use acervo_entity::permission::FolderPermission;
use acervo_service::folder::{FolderContent, SearchResults, WithAccess};

use crate::dto::request::{
    CreateFolderRequest, FolderSearchQuery, MoveFolderRequest, RenameFolderRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, Path, Query, ValidatedJson};
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), AppError> {
    let folder = state
        .folder_service
        .create_folder(&auth, &req.name, req.parent_folder_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WithAccess<Folder>>>, AppError> {
    let folder = state.folder_service.get_folder(&auth, id).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// GET /api/folders/{id}/content
pub async fn get_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FolderContent>>, AppError> {
    let content = state.folder_service.get_content(&auth, id).await?;
    Ok(Json(ApiResponse::ok(content)))
}

/// PUT /api/folders/{id}
pub async fn rename_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RenameFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, AppError> {
    let folder = state
        .folder_service
        .rename_folder(&auth, id, &req.name)
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PUT /api/folders/{id}/move
pub async fn move_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<MoveFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, AppError> {
    let folder = state
        .folder_service
        .move_folder(&auth, id, req.new_parent_folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.folder_service.delete_folder(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Folder deleted"))))
}

/// GET /api/folders/search
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FolderSearchQuery>,
) -> Result<Json<ApiResponse<SearchResults>>, AppError> {
    let results = state
        .search_service
        .search(
            &auth,
            query.organization_id,
            &query.search_term,
            query.folder_id,
        )
        .await?;
    Ok(Json(ApiResponse::ok(results)))
}

/// GET /api/folders/{id}/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FolderPermission>>>, AppError> {
    let grants = state.permission_service.list_for_folder(&auth, id).await?;
    Ok(Json(ApiResponse::ok(grants)))
}
