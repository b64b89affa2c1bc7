//! Folder CRUD operations with access checks.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use acervo_auth::acl::FolderAccessResolver;
use acervo_core::error::AppError;
use acervo_database::{FileStore, FolderStore, StorageUsage};
use acervo_entity::audit::{AuditAction, AuditTarget};
use acervo_entity::file::File;
use acervo_entity::folder::PATH_SEPARATOR;
use acervo_entity::folder::{CreateFolder, Folder};
use acervo_entity::permission::AccessLevel;
use acervo_storage::StorageManager;

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::path::{build_path, descendant_scope, subtree_paths};

/// An item tagged with the caller's access level.
#[derive(Debug, Clone, Serialize)]
pub struct WithAccess<T> {
    /// The item itself.
    #[serde(flatten)]
    pub item: T,
    /// What the caller may do with it.
    #[serde(rename = "accessLevel")]
    pub access_level: AccessLevel,
}

impl<T> WithAccess<T> {
    /// Tags `item` with `access_level`.
    pub fn new(item: T, access_level: AccessLevel) -> Self {
        Self { item, access_level }
    }
}

/// A folder with its direct children.
#[derive(Debug, Clone, Serialize)]
pub struct FolderContent {
    /// The folder itself.
    pub folder: WithAccess<Folder>,
    /// Direct subfolders visible to the caller, ordered by name.
    pub subfolders: Vec<WithAccess<Folder>>,
    /// Files directly inside the folder, ordered by display name.
    pub files: Vec<WithAccess<File>>,
}

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    folder_repo: Arc<dyn FolderStore>,
    file_repo: Arc<dyn FileStore>,
    usage: Arc<dyn StorageUsage>,
    storage: Arc<StorageManager>,
    access: Arc<FolderAccessResolver>,
    recorder: AuditRecorder,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_repo: Arc<dyn FolderStore>,
        file_repo: Arc<dyn FileStore>,
        usage: Arc<dyn StorageUsage>,
        storage: Arc<StorageManager>,
        access: Arc<FolderAccessResolver>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            usage,
            storage,
            access,
            recorder,
        }
    }

    /// Creates a folder at the root of the caller's organization or under
    /// `parent_folder_id`.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_folder_id: Option<Uuid>,
    ) -> Result<Folder, AppError> {
        let name = validate_name(name)?;

        match parent_folder_id {
            Some(parent_id) => {
                let parent = folder_in_org(self.folder_repo.as_ref(), ctx, parent_id).await?;
                self.access
                    .require(ctx.user_id, ctx.role, parent.id, AccessLevel::Manage)
                    .await?;
            }
            None => require_root_access(ctx)?,
        }

        self.ensure_name_free(ctx.organization_id, parent_folder_id, name)
            .await?;

        let path = build_path(self.folder_repo.as_ref(), name, parent_folder_id).await?;
        let folder = self
            .folder_repo
            .create(&CreateFolder {
                name: name.to_string(),
                path,
                parent_folder_id,
                organization_id: ctx.organization_id,
            })
            .await?;

        self.recorder.record(
            ctx.user_id,
            AuditTarget::Folder(folder.id),
            AuditAction::CreateFolder,
        );

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );

        Ok(folder)
    }

    /// Gets a folder the caller may read.
    pub async fn get_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<WithAccess<Folder>, AppError> {
        let folder = folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;
        let level = self
            .access
            .require(ctx.user_id, ctx.role, folder.id, AccessLevel::Read)
            .await?;
        Ok(WithAccess::new(folder, level))
    }

    /// Lists the direct content of a folder.
    ///
    /// Subfolders resolving to NO_ACCESS are left out. Files carry the
    /// level of the folder they live in.
    pub async fn get_content(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<FolderContent, AppError> {
        let folder = self.get_folder(ctx, folder_id).await?;
        let level = folder.access_level;

        let mut subfolders = Vec::new();
        for child in self.folder_repo.find_children(folder_id).await? {
            let child_level = self.access.resolve(ctx.user_id, ctx.role, child.id).await?;
            if child_level.is_granted() {
                subfolders.push(WithAccess::new(child, child_level));
            }
        }

        let files = self
            .file_repo
            .find_by_folder(folder_id)
            .await?
            .into_iter()
            .map(|file| WithAccess::new(file, level))
            .collect();

        Ok(FolderContent {
            folder,
            subfolders,
            files,
        })
    }

    /// Renames a folder and rewrites the paths of its whole subtree.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_name: &str,
    ) -> Result<Folder, AppError> {
        let new_name = validate_name(new_name)?;
        let folder = folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;
        self.access
            .require(ctx.user_id, ctx.role, folder.id, AccessLevel::Manage)
            .await?;

        if folder.name == new_name {
            return Ok(folder);
        }
        self.ensure_name_free(ctx.organization_id, folder.parent_folder_id, new_name)
            .await?;

        let updated = self
            .relocate(&folder, new_name, folder.parent_folder_id)
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            old_path = %folder.path,
            new_path = %updated.path,
            "Folder renamed"
        );

        Ok(updated)
    }

    /// Moves a folder under `new_parent_id`, or to the root when `None`.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> Result<Folder, AppError> {
        let folder = folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;
        self.access
            .require(ctx.user_id, ctx.role, folder.id, AccessLevel::Manage)
            .await?;

        match new_parent_id {
            Some(target_id) => {
                if target_id == folder_id {
                    return Err(AppError::validation("A folder cannot be moved into itself"));
                }
                let target = folder_in_org(self.folder_repo.as_ref(), ctx, target_id).await?;
                self.access
                    .require(ctx.user_id, ctx.role, target.id, AccessLevel::Manage)
                    .await?;

                let subtree = descendant_scope(self.folder_repo.as_ref(), folder_id).await?;
                if subtree.contains(&target_id) {
                    return Err(AppError::validation(
                        "A folder cannot be moved into one of its descendants",
                    ));
                }
            }
            None => require_root_access(ctx)?,
        }

        if folder.parent_folder_id == new_parent_id {
            return Ok(folder);
        }
        self.ensure_name_free(ctx.organization_id, new_parent_id, &folder.name)
            .await?;

        let updated = self.relocate(&folder, &folder.name, new_parent_id).await?;

        self.recorder.record(
            ctx.user_id,
            AuditTarget::Folder(folder_id),
            AuditAction::MoveFolder,
        );

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            new_path = %updated.path,
            "Folder moved"
        );

        Ok(updated)
    }

    /// Deletes a folder with everything inside it.
    ///
    /// Stored objects of the contained files are removed first on a
    /// best-effort basis; failures are logged and do not stop the delete.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> Result<(), AppError> {
        let folder = folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;
        self.access
            .require(ctx.user_id, ctx.role, folder.id, AccessLevel::Manage)
            .await?;

        let subtree = descendant_scope(self.folder_repo.as_ref(), folder_id).await?;
        let files = self.file_repo.find_in_folders(&subtree).await?;

        for file in &files {
            if let Err(e) = self.storage.remove(&file.filename).await {
                warn!(
                    file_id = %file.id,
                    key = %file.filename,
                    error = %e,
                    "Failed to remove stored object during folder delete"
                );
            }
        }

        if !self.folder_repo.delete(folder_id).await? {
            return Err(AppError::not_found("Folder not found"));
        }

        let freed: i64 = files.iter().map(|f| f.size_bytes).sum();
        if freed > 0 {
            self.usage
                .add_used_storage(ctx.organization_id, -freed)
                .await?;
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            folders = subtree.len(),
            files = files.len(),
            "Folder deleted"
        );

        Ok(())
    }

    /// Sibling names are only checked here, not by a constraint, so two
    /// concurrent creates of the same name may both succeed.
    async fn ensure_name_free(
        &self,
        organization_id: Uuid,
        parent_folder_id: Option<Uuid>,
        name: &str,
    ) -> Result<(), AppError> {
        if self
            .folder_repo
            .exists_sibling(organization_id, parent_folder_id, name)
            .await?
        {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }
        Ok(())
    }

    /// Persists a new name and parent and rewrites every path below.
    async fn relocate(
        &self,
        folder: &Folder,
        name: &str,
        parent_folder_id: Option<Uuid>,
    ) -> Result<Folder, AppError> {
        let new_path = build_path(self.folder_repo.as_ref(), name, parent_folder_id).await?;

        let subtree = descendant_scope(self.folder_repo.as_ref(), folder.id).await?;
        let descendants = self.folder_repo.find_by_ids(&subtree[1..]).await?;
        let paths = subtree_paths(folder.id, &new_path, &descendants)?;

        self.folder_repo
            .relocate(folder.id, name, parent_folder_id, &paths)
            .await
    }
}

/// Loads a folder of the caller's organization.
pub(crate) async fn folder_in_org(
    repo: &dyn FolderStore,
    ctx: &RequestContext,
    folder_id: Uuid,
) -> Result<Folder, AppError> {
    repo.folder(folder_id)
        .await?
        .filter(|f| f.organization_id == ctx.organization_id)
        .ok_or_else(|| AppError::not_found("Folder not found"))
}

/// Only bypass roles place folders at the organization root.
fn require_root_access(ctx: &RequestContext) -> Result<(), AppError> {
    if ctx.bypasses_folder_acl() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only administrators can manage root folders",
        ))
    }
}

fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if name.contains(PATH_SEPARATOR) {
        return Err(AppError::validation(format!(
            "Folder name cannot contain '{PATH_SEPARATOR}'"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use acervo_core::error::ErrorKind;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Theses 2024 ").unwrap(), "Theses 2024");
        assert_eq!(validate_name("").unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(validate_name("a/b").unwrap_err().kind, ErrorKind::Validation);
    }

    #[test]
    fn test_root_access_needs_bypass_role() {
        use acervo_entity::user::UserRole;

        let mut ctx = RequestContext::new(Uuid::new_v4(), "a@b.c".into(), UserRole::Admin, Uuid::new_v4());
        assert!(require_root_access(&ctx).is_ok());
        ctx.role = UserRole::AcademicRegister;
        assert_eq!(require_root_access(&ctx).unwrap_err().kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_with_access_flattens() {
        let value = serde_json::to_value(WithAccess::new(
            serde_json::json!({"name": "A"}),
            AccessLevel::Read,
        ))
        .unwrap();
        assert_eq!(value["name"], "A");
        assert_eq!(value["accessLevel"], "READ");
        assert!(value.get("access_level").is_none());
    }
}
