//! User handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::types::pagination::PageResponse;
use acervo_entity::user::User;

use crate::dto::request::{CreateUserRequest, UpdateUserRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, PaginationParams, Path, Query, ValidatedJson};
use crate::state::AppState;

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = state.user_service.create_user(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<User>>>, AppError> {
    let page = state
        .user_service
        .list_users(&auth, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/users/search/{term}
pub async fn search_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(term): Path<String>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state.user_service.search_users(&auth, &term).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/coordinators
pub async fn list_coordinators(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state.user_service.list_coordinators(&auth).await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.user_service.get_user(&auth, id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state
        .user_service
        .update_user(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.user_service.delete_user(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("User deleted"))))
}

/// POST /api/users/{id}/activate
pub async fn activate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.user_service.set_active(&auth, id, true).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/users/{id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.user_service.set_active(&auth, id, false).await?;
    Ok(Json(ApiResponse::ok(user)))
}
