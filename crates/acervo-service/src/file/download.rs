//! File download.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use acervo_auth::acl::FolderAccessResolver;
use acervo_core::error::AppError;
use acervo_core::traits::storage::ByteStream;
use acervo_database::FileStore;
use acervo_entity::audit::{AuditAction, AuditTarget};
use acervo_entity::file::File;
use acervo_entity::permission::AccessLevel;
use acervo_storage::StorageManager;

use super::service::file_in_org;
use crate::audit::AuditRecorder;
use crate::context::RequestContext;

/// A file record with its content stream.
pub struct Download {
    pub file: File,
    pub body: ByteStream,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download").field("file", &self.file).finish()
    }
}

/// Streams file content to users with READ access.
#[derive(Debug, Clone)]
pub struct DownloadService {
    file_repo: Arc<dyn FileStore>,
    storage: Arc<StorageManager>,
    access: Arc<FolderAccessResolver>,
    recorder: AuditRecorder,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(
        file_repo: Arc<dyn FileStore>,
        storage: Arc<StorageManager>,
        access: Arc<FolderAccessResolver>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            file_repo,
            storage,
            access,
            recorder,
        }
    }

    /// Opens the content of a file. Records DOWNLOAD_FILE.
    pub async fn download(&self, ctx: &RequestContext, file_id: Uuid) -> Result<Download, AppError> {
        let file = file_in_org(self.file_repo.as_ref(), ctx, file_id).await?;
        self.access
            .require(ctx.user_id, ctx.role, file.folder_id, AccessLevel::Read)
            .await?;

        let body = self.storage.stream(&file.filename).await.map_err(|e| {
            if e.is_not_found() {
                AppError::not_found("File content not found in storage")
            } else {
                e
            }
        })?;

        self.recorder
            .record(ctx.user_id, AuditTarget::File(file.id), AuditAction::DownloadFile);

        info!(user_id = %ctx.user_id, file_id = %file.id, "File downloaded");
        Ok(Download { file, body })
    }
}
