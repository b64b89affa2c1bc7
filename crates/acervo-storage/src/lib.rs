//! # acervo-storage
//!
//! Object storage providers for Acervo: the local filesystem (development
//! and tests) and S3-compatible object stores. Files are stored flat under
//! their generated storage key and served through time-limited URLs.

pub mod manager;
pub mod providers;

pub use manager::StorageManager;
