//! Core type definitions used across the Acervo workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
