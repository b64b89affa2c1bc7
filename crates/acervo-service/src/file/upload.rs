//! File upload.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use acervo_auth::acl::FolderAccessResolver;
use acervo_core::error::AppError;
use acervo_database::{FileStore, FolderStore, StorageUsage};
use acervo_entity::audit::{AuditAction, AuditTarget};
use acervo_entity::file::{CreateFile, File};
use acervo_entity::permission::AccessLevel;
use acervo_storage::StorageManager;

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::folder::service::folder_in_org;
use crate::path::file_path;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// One file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedPart {
    /// Name the client gave the file.
    pub original_name: String,
    /// Content type the client reported, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// Stores uploaded files and registers them in a folder.
#[derive(Debug, Clone)]
pub struct UploadService {
    file_repo: Arc<dyn FileStore>,
    folder_repo: Arc<dyn FolderStore>,
    usage: Arc<dyn StorageUsage>,
    storage: Arc<StorageManager>,
    access: Arc<FolderAccessResolver>,
    recorder: AuditRecorder,
    max_upload_size: u64,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        file_repo: Arc<dyn FileStore>,
        folder_repo: Arc<dyn FolderStore>,
        usage: Arc<dyn StorageUsage>,
        storage: Arc<StorageManager>,
        access: Arc<FolderAccessResolver>,
        recorder: AuditRecorder,
        max_upload_size: u64,
    ) -> Self {
        Self {
            file_repo,
            folder_repo,
            usage,
            storage,
            access,
            recorder,
            max_upload_size,
        }
    }

    /// Uploads `parts` into `folder_id`. Each stored file records
    /// UPLOAD_FILE and adds to the organization's storage usage.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        parts: Vec<UploadedPart>,
    ) -> Result<Vec<File>, AppError> {
        if parts.is_empty() {
            return Err(AppError::validation("No files were uploaded"));
        }
        for part in &parts {
            if part.data.len() as u64 > self.max_upload_size {
                return Err(AppError::validation(format!(
                    "'{}' exceeds the maximum upload size of {} bytes",
                    part.original_name, self.max_upload_size
                )));
            }
        }

        let folder = folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;
        self.access
            .require(ctx.user_id, ctx.role, folder.id, AccessLevel::Manage)
            .await?;

        let mut stamp = 0;
        let mut uploaded = Vec::with_capacity(parts.len());
        for part in parts {
            stamp = Utc::now().timestamp_millis().max(stamp + 1);
            let key = storage_key(&part.original_name, stamp);
            let mime_type = part
                .content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
            let size_bytes = part.data.len() as i64;

            self.storage.put(&key, part.data, &mime_type).await?;

            let created = self
                .file_repo
                .create(&CreateFile {
                    path: file_path(&folder, &key),
                    filename: key.clone(),
                    display_name: part.original_name,
                    mime_type,
                    size_bytes,
                    folder_id: folder.id,
                    organization_id: folder.organization_id,
                    uploaded_by: ctx.user_id,
                })
                .await;

            let file = match created {
                Ok(file) => file,
                Err(e) => {
                    if let Err(cleanup) = self.storage.remove(&key).await {
                        warn!(key = %key, error = %cleanup, "Failed to remove orphaned object");
                    }
                    return Err(e);
                }
            };

            self.usage
                .add_used_storage(folder.organization_id, size_bytes)
                .await?;
            self.recorder
                .record(ctx.user_id, AuditTarget::File(file.id), AuditAction::UploadFile);

            info!(
                user_id = %ctx.user_id,
                file_id = %file.id,
                folder_id = %folder.id,
                size_bytes,
                "File uploaded"
            );
            uploaded.push(file);
        }

        Ok(uploaded)
    }
}

/// Storage key for an upload: `{stem}_{unix_millis}{ext}`.
///
/// Directory components of the client name are discarded.
pub fn storage_key(original_name: &str, unix_millis: i64) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let path = Path::new(base);

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("file");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{unix_millis}.{ext}"),
        None => format!("{stem}_{unix_millis}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_keeps_extension() {
        assert_eq!(
            storage_key("tcc final.pdf", 1_700_000_000_000),
            "tcc final_1700000000000.pdf"
        );
    }

    #[test]
    fn test_storage_key_without_extension() {
        assert_eq!(storage_key("README", 5), "README_5");
    }

    #[test]
    fn test_storage_key_strips_directories() {
        assert_eq!(storage_key("../../etc/passwd", 7), "passwd_7");
        assert_eq!(storage_key("C:\\docs\\thesis.docx", 7), "thesis_7.docx");
    }

    #[test]
    fn test_storage_key_multiple_dots() {
        assert_eq!(storage_key("archive.tar.gz", 1), "archive.tar_1.gz");
    }

    #[test]
    fn test_storage_key_empty_name() {
        assert_eq!(storage_key("", 3), "file_3");
    }
}
