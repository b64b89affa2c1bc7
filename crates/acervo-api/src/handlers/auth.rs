//! Auth handlers: sign-up, login, me, password reset.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use acervo_core::error::AppError;
use acervo_entity::user::User;
use acervo_service::auth::LoginResult;

use crate::dto::request::{
    ConfirmResetRequest, LoginRequest, ResetRequest, SignUpRequest, VerifyCodeRequest,
};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResult>>), AppError> {
    let result = state.auth_service.sign_up(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, AppError> {
    let result = state.auth_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state.auth_service.me(&auth).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// POST /api/auth/password-reset/request
pub async fn request_reset(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResetRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .password_reset_service
        .request_reset(&req.email)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "A reset code was sent to your email",
    ))))
}

/// POST /api/auth/password-reset/verify
pub async fn verify_code(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyCodeRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .password_reset_service
        .verify_code(&req.email, &req.code)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Code is valid"))))
}

/// POST /api/auth/password-reset/confirm
pub async fn confirm_reset(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ConfirmResetRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    state
        .password_reset_service
        .confirm_reset(&req.email, &req.code, &req.password)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Password updated",
    ))))
}
