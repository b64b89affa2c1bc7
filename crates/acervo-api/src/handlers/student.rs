//! Student handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::types::pagination::PageResponse;
use acervo_entity::student::{Student, StudentSummary};

use crate::dto::request::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, PaginationParams, Path, Query, ValidatedJson};
use crate::state::AppState;

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Student>>), AppError> {
    let student = state.student_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(student))))
}

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<StudentListQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<StudentSummary>>>, AppError> {
    let page = state
        .student_service
        .list(&auth, query.course_id, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/students/{id}
pub async fn get_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let student = state.student_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(student)))
}

/// PUT /api/students/{id}
pub async fn update_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let student = state
        .student_service
        .update(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(student)))
}

/// DELETE /api/students/{id}
pub async fn delete_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.student_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Student deleted"))))
}
