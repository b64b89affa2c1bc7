//! Acervo Server: thesis archive management backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use acervo_api::{AppState, build_app};
use acervo_auth::{
    FolderAccessResolver, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator,
    RbacEnforcer, ResetCodeStore,
};
use acervo_cache::CacheManager;
use acervo_core::config::AppConfig;
use acervo_database::repositories::{
    AccessHistoryRepository, CourseRepository, FileRepository, FolderRepository,
    OrganizationRepository, PermissionRepository, StudentRepository, TccRepository,
    UserRepository,
};
use acervo_database::{
    AccessHistorySink, CourseStore, DatabasePool, FileStore, FolderStore, PermissionLookup,
    StorageUsage, StudentStore, TccStore, UserLookup,
};
use acervo_service::{
    AuditRecorder, AuditService, AuthService, CourseService, DownloadService, EmailService,
    FileService, FolderService, OrganizationService, PasswordResetService, PermissionService,
    SearchService, StudentService, TccService, TreeService, UploadService, UserService,
};
use acervo_storage::StorageManager;

#[tokio::main]
async fn main() {
    let env = std::env::var("ACERVO_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = ?e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Acervo v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database)
        .await
        .context("database connection failed")?;
    acervo_database::migration::run_migrations(db.pool())
        .await
        .context("database migration failed")?;

    // ── Step 2: Cache and storage ────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = CacheManager::new(&config.cache)
        .await
        .context("cache initialization failed")?;

    tracing::info!(provider = %config.storage.provider, "Initializing storage");
    let storage = Arc::new(
        StorageManager::from_config(&config.storage)
            .await
            .context("storage initialization failed")?,
    );

    // ── Step 3: Repositories ─────────────────────────────────────
    let pool = db.pool().clone();
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let org_repo = Arc::new(OrganizationRepository::new(pool.clone()));
    let permission_repo = Arc::new(PermissionRepository::new(pool.clone()));
    let history_repo = Arc::new(AccessHistoryRepository::new(pool.clone()));
    let folders: Arc<dyn FolderStore> = Arc::new(FolderRepository::new(pool.clone()));
    let files: Arc<dyn FileStore> = Arc::new(FileRepository::new(pool.clone()));
    let courses: Arc<dyn CourseStore> = Arc::new(CourseRepository::new(pool.clone()));
    let students: Arc<dyn StudentStore> = Arc::new(StudentRepository::new(pool.clone()));
    let tccs: Arc<dyn TccStore> = Arc::new(TccRepository::new(pool));
    let usage: Arc<dyn StorageUsage> = org_repo.clone();
    let users: Arc<dyn UserLookup> = user_repo.clone();

    // ── Step 4: Auth ─────────────────────────────────────────────
    let hasher = PasswordHasher::new();
    let validator = PasswordValidator::new(&config.auth);
    let rbac = Arc::new(RbacEnforcer::new());
    let grants: Arc<dyn PermissionLookup> = permission_repo.clone();
    let access = Arc::new(FolderAccessResolver::new(grants));
    let reset_codes = ResetCodeStore::new(cache.clone(), &config.auth);

    // ── Step 5: Audit worker ─────────────────────────────────────
    let sink: Arc<dyn AccessHistorySink> = history_repo.clone();
    let (recorder, audit_worker) = AuditRecorder::spawn(sink, config.audit.queue_capacity);

    // ── Step 6: Services ─────────────────────────────────────────
    let email = Arc::new(EmailService::new(config.email.clone()).context("email setup failed")?);

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        hasher.clone(),
        validator.clone(),
        JwtEncoder::new(&config.auth),
        JwtDecoder::new(&config.auth),
    ));
    let password_reset_service = Arc::new(PasswordResetService::new(
        Arc::clone(&user_repo),
        reset_codes,
        Arc::clone(&email),
        hasher.clone(),
        validator.clone(),
        config.auth.reset_code_ttl_minutes,
    ));
    let organization_service = Arc::new(OrganizationService::new(
        Arc::clone(&org_repo),
        Arc::clone(&rbac),
    ));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&rbac),
        hasher,
        validator,
        Arc::clone(&email),
    ));
    let folder_service = Arc::new(FolderService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&usage),
        Arc::clone(&storage),
        Arc::clone(&access),
        recorder.clone(),
    ));
    let tree_service = Arc::new(TreeService::new(Arc::clone(&folders), Arc::clone(&org_repo)));
    let search_service = Arc::new(SearchService::new(
        Arc::clone(&folders),
        Arc::clone(&files),
        Arc::clone(&access),
    ));
    let file_service = Arc::new(FileService::new(
        Arc::clone(&files),
        Arc::clone(&folders),
        Arc::clone(&usage),
        Arc::clone(&storage),
        Arc::clone(&access),
        recorder.clone(),
    ));
    let upload_service = Arc::new(UploadService::new(
        Arc::clone(&files),
        Arc::clone(&folders),
        Arc::clone(&usage),
        Arc::clone(&storage),
        Arc::clone(&access),
        recorder.clone(),
        config.storage.max_upload_size_bytes,
    ));
    let download_service = Arc::new(DownloadService::new(
        Arc::clone(&files),
        Arc::clone(&storage),
        Arc::clone(&access),
        recorder.clone(),
    ));
    let permission_service = Arc::new(PermissionService::new(
        Arc::clone(&permission_repo),
        Arc::clone(&folders),
        Arc::clone(&user_repo),
        Arc::clone(&rbac),
    ));
    let audit_service = Arc::new(AuditService::new(
        history_repo,
        Arc::clone(&files),
        Arc::clone(&user_repo),
        Arc::clone(&rbac),
    ));
    let course_service = Arc::new(CourseService::new(
        Arc::clone(&courses),
        Arc::clone(&users),
        Arc::clone(&rbac),
    ));
    let student_service = Arc::new(StudentService::new(
        Arc::clone(&students),
        Arc::clone(&courses),
    ));
    let tcc_service = Arc::new(TccService::new(
        tccs,
        students,
        courses,
        files,
        users,
        storage,
        recorder.clone(),
    ));

    // ── Step 7: HTTP server ──────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        db: db.clone(),
        cache,
        audit: recorder.clone(),
        auth_service,
        password_reset_service,
        organization_service,
        user_service,
        folder_service,
        tree_service,
        search_service,
        file_service,
        upload_service,
        download_service,
        permission_service,
        audit_service,
        course_service,
        student_service,
        tcc_service,
    };
    drop(recorder);

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Acervo server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // The router and its recorder clones are gone; the worker drains and exits.
    match audit_worker.await {
        Ok(dropped) if dropped > 0 => {
            tracing::warn!(dropped, "Access history entries were dropped during this run");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Audit worker ended abnormally"),
    }
    db.close().await;

    tracing::info!("Acervo server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
