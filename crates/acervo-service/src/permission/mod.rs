//! Folder permission management.

pub mod service;

pub use service::PermissionService;
