//! TCC handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::types::pagination::PageResponse;
use acervo_entity::tcc::{Tcc, TccFileKind, TccRecord};

use super::file::download_response;
use crate::dto::request::{CreateTccRequest, DefenseRecordRequest, TccListQuery, UpdateTccRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, PaginationParams, Path, Query, ValidatedJson};
use crate::state::AppState;

/// POST /api/tccs
pub async fn create_tcc(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTccRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tcc>>), AppError> {
    let tcc = state.tcc_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(tcc))))
}

/// GET /api/tccs
pub async fn list_tccs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TccListQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<TccRecord>>>, AppError> {
    let page = state
        .tcc_service
        .list(&auth, query.into(), params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/tccs/{id}
pub async fn get_tcc(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TccRecord>>, AppError> {
    let tcc = state.tcc_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(tcc)))
}

/// PUT /api/tccs/{id}
pub async fn update_tcc(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateTccRequest>,
) -> Result<Json<ApiResponse<Tcc>>, AppError> {
    let tcc = state.tcc_service.update(&auth, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(tcc)))
}

/// PUT /api/tccs/{id}/defense-record
pub async fn attach_defense_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<DefenseRecordRequest>,
) -> Result<Json<ApiResponse<Tcc>>, AppError> {
    let tcc = state
        .tcc_service
        .attach_defense_record(&auth, id, req.file_id)
        .await?;
    Ok(Json(ApiResponse::ok(tcc)))
}

/// DELETE /api/tccs/{id}
pub async fn delete_tcc(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.tcc_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("TCC deleted"))))
}

/// GET /api/tccs/{id}/download/{file_type}
///
/// `file_type` is `main` for the thesis or `defense` for the defense record.
pub async fn download_tcc_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, file_type)): Path<(Uuid, TccFileKind)>,
) -> Result<Response, AppError> {
    let download = state.tcc_service.download(&auth, id, file_type).await?;
    download_response(download)
}
