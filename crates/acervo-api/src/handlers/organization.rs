//! Organization handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::types::pagination::PageResponse;
use acervo_entity::folder::FolderNode;
use acervo_entity::organization::Organization;
use acervo_service::organization::StorageUsageView;

use crate::dto::request::{CreateOrganizationRequest, UpdateOrganizationRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, PaginationParams, Path, Query, ValidatedJson};
use crate::state::AppState;

/// POST /api/organizations
pub async fn create_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Organization>>), AppError> {
    let org = state
        .organization_service
        .create(&auth, &req.name, req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(org))))
}

/// GET /api/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Organization>>>, AppError> {
    let page = state
        .organization_service
        .list(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/organizations/{id}
pub async fn get_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Organization>>, AppError> {
    let org = state.organization_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// GET /api/organizations/{id}/storage
pub async fn storage_usage(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StorageUsageView>>, AppError> {
    let usage = state.organization_service.storage_usage(&auth, id).await?;
    Ok(Json(ApiResponse::ok(usage)))
}

/// PUT /api/organizations/{id}
pub async fn update_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateOrganizationRequest>,
) -> Result<Json<ApiResponse<Organization>>, AppError> {
    let org = state
        .organization_service
        .update(&auth, id, req.name, req.description)
        .await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// DELETE /api/organizations/{id}
pub async fn delete_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.organization_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Organization deleted",
    ))))
}

/// POST /api/organizations/{id}/activate
pub async fn activate_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Organization>>, AppError> {
    let org = state.organization_service.set_active(&auth, id, true).await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// POST /api/organizations/{id}/deactivate
pub async fn deactivate_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Organization>>, AppError> {
    let org = state
        .organization_service
        .set_active(&auth, id, false)
        .await?;
    Ok(Json(ApiResponse::ok(org)))
}

/// GET /api/organizations/{id}/folders
pub async fn folder_tree(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<FolderNode>>>, AppError> {
    let tree = state.tree_service.organization_tree(&auth, id).await?;
    Ok(Json(ApiResponse::ok(tree)))
}
