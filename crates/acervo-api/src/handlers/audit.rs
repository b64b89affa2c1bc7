//! Access history handlers.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::types::pagination::PageResponse;
use acervo_entity::audit::AccessHistoryEntry;
use acervo_service::audit::service::{AUDIT_PAGE_SIZE, SCOPED_AUDIT_PAGE_SIZE};

use crate::dto::request::AuditQuery;
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, PaginationParams, Path, Query};
use crate::state::AppState;

/// GET /api/audit
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AuditQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<AccessHistoryEntry>>>, AppError> {
    let page = state
        .audit_service
        .search(
            &auth,
            &query.into(),
            params.with_default_size(AUDIT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/audit/files/{id}
pub async fn for_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<AccessHistoryEntry>>>, AppError> {
    let page = state
        .audit_service
        .for_file(&auth, id, params.with_default_size(SCOPED_AUDIT_PAGE_SIZE))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/audit/users/{id}
pub async fn for_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<AccessHistoryEntry>>>, AppError> {
    let page = state
        .audit_service
        .for_user(&auth, id, params.with_default_size(SCOPED_AUDIT_PAGE_SIZE))
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}
