//! Course handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_entity::course::{Course, CourseSummary};

use crate::dto::request::{CreateCourseRequest, UpdateCourseRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, Path, ValidatedJson};
use crate::state::AppState;

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), AppError> {
    let course = state
        .course_service
        .create(&auth, &req.name, req.coordinator_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(course))))
}

/// GET /api/courses
pub async fn list_courses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<CourseSummary>>>, AppError> {
    let courses = state.course_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(courses)))
}

/// GET /api/courses/{id}
pub async fn get_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    let course = state.course_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(course)))
}

/// PUT /api/courses/{id}
pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCourseRequest>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    let course = state
        .course_service
        .update(&auth, id, req.name, req.coordinator_id)
        .await?;
    Ok(Json(ApiResponse::ok(course)))
}

/// DELETE /api/courses/{id}
pub async fn delete_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state.course_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Course deleted"))))
}
