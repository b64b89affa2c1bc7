//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
///
/// 200 when the database and the cache answer, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let database = answered("database", state.db.health_check().await);
    let cache = answered("cache", state.cache.health_check().await);

    let healthy = database && cache;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ApiResponse::ok(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: label(database),
            cache: label(cache),
            audit_dropped: state.audit.dropped(),
        })),
    )
}

fn answered(name: &str, result: Result<bool, acervo_core::error::AppError>) -> bool {
    match result {
        Ok(up) => up,
        Err(e) => {
            warn!(dependency = name, error = %e, "Health check failed");
            false
        }
    }
}

fn label(up: bool) -> String {
    if up { "up" } else { "down" }.to_string()
}
