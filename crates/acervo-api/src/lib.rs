//! # acervo-api
//!
//! HTTP API layer for Acervo built on Axum.
//!
//! Provides the REST endpoints, middleware (CORS, request logging),
//! extractors and DTOs. Error rendering lives in `acervo_core::http`.

pub mod app;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
