//! File metadata operations with access checks.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use acervo_auth::acl::FolderAccessResolver;
use acervo_core::error::AppError;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_database::{FileStore, FolderStore, StorageUsage};
use acervo_entity::audit::{AuditAction, AuditTarget};
use acervo_entity::file::File;
use acervo_entity::permission::AccessLevel;
use acervo_storage::StorageManager;

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::folder::service::folder_in_org;
use crate::path::file_path;

/// A file in a listing.
#[derive(Debug, Clone, Serialize)]
pub struct FileView {
    #[serde(flatten)]
    pub file: File,
    #[serde(rename = "accessLevel")]
    pub access_level: AccessLevel,
    /// Presigned URL when the backend issues one, otherwise the download route.
    pub url: String,
}

/// A single file with the state of its stored object.
#[derive(Debug, Clone, Serialize)]
pub struct FileDetails {
    #[serde(flatten)]
    pub file: File,
    #[serde(rename = "accessLevel")]
    pub access_level: AccessLevel,
    pub url: String,
    /// Whether the stored object could be found.
    pub content_available: bool,
}

/// Manages file metadata: listing, viewing, renaming, moving, deleting.
#[derive(Debug, Clone)]
pub struct FileService {
    file_repo: Arc<dyn FileStore>,
    folder_repo: Arc<dyn FolderStore>,
    usage: Arc<dyn StorageUsage>,
    storage: Arc<StorageManager>,
    access: Arc<FolderAccessResolver>,
    recorder: AuditRecorder,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        file_repo: Arc<dyn FileStore>,
        folder_repo: Arc<dyn FolderStore>,
        usage: Arc<dyn StorageUsage>,
        storage: Arc<StorageManager>,
        access: Arc<FolderAccessResolver>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            file_repo,
            folder_repo,
            usage,
            storage,
            access,
            recorder,
        }
    }

    /// Lists the files of the caller's organization, newest first.
    ///
    /// Users without a bypass role only see files in folders they hold a
    /// grant on.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<FileView>, AppError> {
        let (files, grants) = if ctx.bypasses_folder_acl() {
            let files = self
                .file_repo
                .find_by_organization(ctx.organization_id, None, &page)
                .await?;
            (files, None)
        } else {
            let grants = self.access.permitted_folders(ctx.user_id).await?;
            let folder_ids: Vec<Uuid> = grants.keys().copied().collect();
            let files = self
                .file_repo
                .find_by_organization(ctx.organization_id, Some(&folder_ids), &page)
                .await?;
            (files, Some(grants))
        };

        let mut urls = Vec::with_capacity(files.items.len());
        for file in &files.items {
            urls.push(self.presign(file).await);
        }
        let mut urls = urls.into_iter();

        Ok(files.map(|file| {
            let access_level = match &grants {
                None => AccessLevel::Manage,
                Some(grants) => grants
                    .get(&file.folder_id)
                    .copied()
                    .unwrap_or(AccessLevel::NoAccess),
            };
            let url = urls.next().unwrap_or_else(|| download_route(file.id));
            FileView {
                file,
                access_level,
                url,
            }
        }))
    }

    /// Gets one file with a download URL. Records VIEW_FILE.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: Uuid) -> Result<FileDetails, AppError> {
        let (file, access_level) = self.authorize(ctx, file_id, AccessLevel::Read).await?;

        let content_available = match self.storage.exists(&file.filename).await {
            Ok(found) => found,
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "Storage existence check failed");
                false
            }
        };
        let url = self.presign(&file).await;

        self.recorder
            .record(ctx.user_id, AuditTarget::File(file.id), AuditAction::ViewFile);

        Ok(FileDetails {
            file,
            access_level,
            url,
            content_available,
        })
    }

    /// Changes the display name of a file. Records EDIT_FILE.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        display_name: &str,
    ) -> Result<File, AppError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::validation("Display name cannot be empty"));
        }

        let (file, _) = self.authorize(ctx, file_id, AccessLevel::Manage).await?;
        let updated = self
            .file_repo
            .update_display_name(file.id, display_name)
            .await?;

        self.recorder
            .record(ctx.user_id, AuditTarget::File(file.id), AuditAction::EditFile);

        info!(user_id = %ctx.user_id, file_id = %file.id, display_name, "File renamed");
        Ok(updated)
    }

    /// Moves a file into another folder. Records MOVE_FILE.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_folder_id: Uuid,
    ) -> Result<File, AppError> {
        let (file, _) = self.authorize(ctx, file_id, AccessLevel::Manage).await?;
        let target = folder_in_org(self.folder_repo.as_ref(), ctx, new_folder_id).await?;
        self.access
            .require(ctx.user_id, ctx.role, target.id, AccessLevel::Manage)
            .await?;

        if file.folder_id == target.id {
            return Ok(file);
        }

        let path = file_path(&target, &file.filename);
        let moved = self.file_repo.move_to(file.id, target.id, &path).await?;

        self.recorder
            .record(ctx.user_id, AuditTarget::File(file.id), AuditAction::MoveFile);

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            from = %file.folder_id,
            to = %target.id,
            "File moved"
        );
        Ok(moved)
    }

    /// Deletes a file.
    ///
    /// The stored object is removed first; a missing object or a storage
    /// failure is logged and the record is deleted anyway, together with
    /// its access history.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> Result<(), AppError> {
        let (file, _) = self.authorize(ctx, file_id, AccessLevel::Manage).await?;

        if let Err(e) = self.storage.remove(&file.filename).await {
            warn!(
                file_id = %file.id,
                key = %file.filename,
                error = %e,
                "Failed to remove stored object; deleting record anyway"
            );
        }

        if !self.file_repo.delete_with_history(file.id).await? {
            return Err(AppError::not_found("File not found"));
        }
        self.usage
            .add_used_storage(file.organization_id, -file.size_bytes)
            .await?;

        info!(user_id = %ctx.user_id, file_id = %file.id, "File deleted");
        Ok(())
    }

    async fn authorize(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        needed: AccessLevel,
    ) -> Result<(File, AccessLevel), AppError> {
        let file = file_in_org(self.file_repo.as_ref(), ctx, file_id).await?;
        let level = self
            .access
            .require(ctx.user_id, ctx.role, file.folder_id, needed)
            .await?;
        Ok((file, level))
    }

    async fn presign(&self, file: &File) -> String {
        match self.storage.presigned_url(&file.filename).await {
            Ok(Some(url)) => url,
            Ok(None) => download_route(file.id),
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "Failed to presign download URL");
                download_route(file.id)
            }
        }
    }
}

/// API route that streams a file's content.
pub fn download_route(file_id: Uuid) -> String {
    format!("/api/files/{file_id}/download")
}

/// Loads a file of the caller's organization.
pub(crate) async fn file_in_org(
    repo: &dyn FileStore,
    ctx: &RequestContext,
    file_id: Uuid,
) -> Result<File, AppError> {
    repo.find_by_id(file_id)
        .await?
        .filter(|f| f.organization_id == ctx.organization_id)
        .ok_or_else(|| AppError::not_found("File not found"))
}
