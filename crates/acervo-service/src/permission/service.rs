//! Grant management for folder permissions.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use acervo_auth::rbac::{RbacEnforcer, SystemPermission};
use acervo_core::error::AppError;
use acervo_database::FolderStore;
use acervo_database::repositories::{PermissionRepository, UserRepository};
use acervo_entity::permission::{AccessLevel, FolderPermission, UpsertFolderPermission};

use crate::context::RequestContext;
use crate::folder::service::folder_in_org;

/// Creates, reads and revokes per-folder grants.
#[derive(Debug, Clone)]
pub struct PermissionService {
    permission_repo: Arc<PermissionRepository>,
    folder_repo: Arc<dyn FolderStore>,
    user_repo: Arc<UserRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(
        permission_repo: Arc<PermissionRepository>,
        folder_repo: Arc<dyn FolderStore>,
        user_repo: Arc<UserRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            permission_repo,
            folder_repo,
            user_repo,
            rbac,
        }
    }

    /// Sets the level of `user_id` on `folder_id`.
    ///
    /// Returns the grant and whether it was newly created.
    pub async fn upsert(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        user_id: Uuid,
        access_level: AccessLevel,
    ) -> Result<(FolderPermission, bool), AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::PermissionManage)?;
        self.check_scope(ctx, folder_id, user_id).await?;

        let (grant, created) = self
            .permission_repo
            .upsert(&UpsertFolderPermission {
                user_id,
                folder_id,
                access_level,
            })
            .await?;

        info!(
            granted_by = %ctx.user_id,
            user_id = %user_id,
            folder_id = %folder_id,
            access_level = %access_level,
            created,
            "Folder permission set"
        );

        Ok((grant, created))
    }

    /// Gets the grant of `user_id` on `folder_id`.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        user_id: Uuid,
    ) -> Result<FolderPermission, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::PermissionManage)?;
        folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;

        self.permission_repo
            .find(user_id, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))
    }

    /// Lists every grant on a folder.
    pub async fn list_for_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<Vec<FolderPermission>, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::PermissionManage)?;
        folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;

        self.permission_repo.find_by_folder(folder_id).await
    }

    /// Removes the grant of `user_id` on `folder_id`.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::PermissionManage)?;
        folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;

        if !self.permission_repo.delete(user_id, folder_id).await? {
            return Err(AppError::not_found("Permission not found"));
        }

        info!(revoked_by = %ctx.user_id, user_id = %user_id, folder_id = %folder_id, "Folder permission revoked");
        Ok(())
    }

    async fn check_scope(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), AppError> {
        folder_in_org(self.folder_repo.as_ref(), ctx, folder_id).await?;
        self.user_repo
            .find_by_id(user_id)
            .await?
            .filter(|u| u.organization_id == ctx.organization_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(())
    }
}
