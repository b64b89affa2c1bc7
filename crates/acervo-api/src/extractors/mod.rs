//! Custom Axum extractors.

pub mod auth;
pub mod pagination;
pub mod params;
pub mod validated;

pub use auth::AuthUser;
pub use pagination::PaginationParams;
pub use params::{Path, Query};
pub use validated::ValidatedJson;
