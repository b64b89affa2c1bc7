//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use acervo_cache::CacheManager;
use acervo_core::config::AppConfig;
use acervo_database::DatabasePool;
use acervo_service::{
    AuditRecorder, AuditService, AuthService, CourseService, DownloadService, FileService,
    FolderService, OrganizationService, PasswordResetService, PermissionService, SearchService,
    StudentService, TccService, TreeService, UploadService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db: DatabasePool,
    /// Cache manager (Redis or in-memory)
    pub cache: CacheManager,
    /// Access history queue, exposed for its drop counter
    pub audit: AuditRecorder,

    // ── Services ─────────────────────────────────────────────
    pub auth_service: Arc<AuthService>,
    pub password_reset_service: Arc<PasswordResetService>,
    pub organization_service: Arc<OrganizationService>,
    pub user_service: Arc<UserService>,
    pub folder_service: Arc<FolderService>,
    pub tree_service: Arc<TreeService>,
    pub search_service: Arc<SearchService>,
    pub file_service: Arc<FileService>,
    pub upload_service: Arc<UploadService>,
    pub download_service: Arc<DownloadService>,
    pub permission_service: Arc<PermissionService>,
    pub audit_service: Arc<AuditService>,
    pub course_service: Arc<CourseService>,
    pub student_service: Arc<StudentService>,
    pub tcc_service: Arc<TccService>,
}
