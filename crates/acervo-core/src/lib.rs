//! # acervo-core
//!
//! Core crate for Acervo. Contains the storage and cache traits,
//! configuration schemas, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Acervo crates.

pub mod config;
pub mod error;
#[cfg(feature = "axum")]
pub mod http;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
