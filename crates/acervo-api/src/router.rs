//! Route definitions for the Acervo HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the API router. Middleware is added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(organization_routes())
        .merge(user_routes())
        .merge(folder_routes())
        .merge(file_routes())
        .merge(permission_routes())
        .merge(course_routes())
        .merge(student_routes())
        .merge(tcc_routes())
        .merge(audit_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Sign-up, login, current user, password reset
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::sign_up))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/auth/password-reset/request",
            post(handlers::auth::request_reset),
        )
        .route(
            "/auth/password-reset/verify",
            post(handlers::auth::verify_code),
        )
        .route(
            "/auth/password-reset/confirm",
            post(handlers::auth::confirm_reset),
        )
}

fn organization_routes() -> Router<AppState> {
    use handlers::organization as h;
    Router::new()
        .route(
            "/organizations",
            post(h::create_organization).get(h::list_organizations),
        )
        .route(
            "/organizations/{id}",
            get(h::get_organization)
                .put(h::update_organization)
                .delete(h::delete_organization),
        )
        .route("/organizations/{id}/activate", post(h::activate_organization))
        .route(
            "/organizations/{id}/deactivate",
            post(h::deactivate_organization),
        )
        .route("/organizations/{id}/folders", get(h::folder_tree))
        .route("/organizations/{id}/storage", get(h::storage_usage))
}

fn user_routes() -> Router<AppState> {
    use handlers::user as h;
    Router::new()
        .route("/users", post(h::create_user).get(h::list_users))
        .route("/users/coordinators", get(h::list_coordinators))
        .route("/users/search/{term}", get(h::search_users))
        .route(
            "/users/{id}",
            get(h::get_user).put(h::update_user).delete(h::delete_user),
        )
        .route("/users/{id}/activate", post(h::activate_user))
        .route("/users/{id}/deactivate", post(h::deactivate_user))
}

fn folder_routes() -> Router<AppState> {
    use handlers::folder as h;
    Router::new()
        .route("/folders", post(h::create_folder))
        .route("/folders/search", get(h::search))
        .route(
            "/folders/{id}",
            get(h::get_folder).put(h::rename_folder).delete(h::delete_folder),
        )
        .route("/folders/{id}/content", get(h::get_content))
        .route("/folders/{id}/move", put(h::move_folder))
        .route("/folders/{id}/permissions", get(h::list_permissions))
}

fn file_routes() -> Router<AppState> {
    use handlers::file as h;
    Router::new()
        .route("/files", get(h::list_files))
        .route("/files/upload", post(h::upload))
        .route(
            "/files/{id}",
            get(h::get_file).put(h::update_file).delete(h::delete_file),
        )
        .route("/files/{id}/download", get(h::download_file))
        .route("/files/{id}/move", put(h::move_file))
}

fn permission_routes() -> Router<AppState> {
    use handlers::permission as h;
    Router::new()
        .route("/permissions", post(h::upsert_permission))
        .route(
            "/permissions/{folder_id}/{user_id}",
            get(h::get_permission).delete(h::delete_permission),
        )
}

fn course_routes() -> Router<AppState> {
    use handlers::course as h;
    Router::new()
        .route("/courses", post(h::create_course).get(h::list_courses))
        .route(
            "/courses/{id}",
            get(h::get_course).put(h::update_course).delete(h::delete_course),
        )
}

fn student_routes() -> Router<AppState> {
    use handlers::student as h;
    Router::new()
        .route("/students", post(h::create_student).get(h::list_students))
        .route(
            "/students/{id}",
            get(h::get_student)
                .put(h::update_student)
                .delete(h::delete_student),
        )
}

fn tcc_routes() -> Router<AppState> {
    use handlers::tcc as h;
    Router::new()
        .route("/tccs", post(h::create_tcc).get(h::list_tccs))
        .route(
            "/tccs/{id}",
            get(h::get_tcc).put(h::update_tcc).delete(h::delete_tcc),
        )
        .route("/tccs/{id}/defense-record", put(h::attach_defense_record))
        .route("/tccs/{id}/download/{file_type}", get(h::download_tcc_file))
}

fn audit_routes() -> Router<AppState> {
    use handlers::audit as h;
    Router::new()
        .route("/audit", get(h::search))
        .route("/audit/files/{id}", get(h::for_file))
        .route("/audit/users/{id}", get(h::for_user))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
