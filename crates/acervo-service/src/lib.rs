//! # acervo-service
//!
//! Business logic service layer for Acervo. Each service orchestrates
//! repositories, cache, storage providers, and authentication to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod academic;
pub mod audit;
pub mod auth;
pub mod context;
pub mod email;
pub mod file;
pub mod folder;
pub mod organization;
pub mod path;
pub mod permission;
pub mod user;

#[cfg(test)]
mod testing;

pub use academic::{CourseService, StudentService, TccService};
pub use audit::{AuditRecorder, AuditService};
pub use auth::{AuthService, PasswordResetService};
pub use context::RequestContext;
pub use email::EmailService;
pub use file::{DownloadService, FileService, UploadService};
pub use folder::{FolderService, SearchService, TreeService};
pub use organization::OrganizationService;
pub use permission::PermissionService;
pub use user::UserService;
