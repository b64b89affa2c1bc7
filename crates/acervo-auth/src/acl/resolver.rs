//! Resolves the access level a user holds on a folder.
//!
//! Resolution order:
//! 1. Bypass roles (ADMIN, SISTEM_MANAGER) hold MANAGE on every folder.
//! 2. Otherwise the explicit grant for `(user, folder)` decides.
//! 3. No grant resolves to NO_ACCESS.
//!
//! Grants are looked up fresh on every call.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::result::AppResult;
use acervo_database::PermissionLookup;
use acervo_entity::permission::AccessLevel;
use acervo_entity::user::UserRole;

/// Decides NO_ACCESS / READ / MANAGE for a user on a folder.
#[derive(Clone)]
pub struct FolderAccessResolver {
    grants: Arc<dyn PermissionLookup>,
}

impl std::fmt::Debug for FolderAccessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderAccessResolver").finish()
    }
}

impl FolderAccessResolver {
    /// Creates a resolver over the given grant lookup.
    pub fn new(grants: Arc<dyn PermissionLookup>) -> Self {
        Self { grants }
    }

    /// Resolves the effective level of `user_id` on `folder_id`.
    pub async fn resolve(
        &self,
        user_id: Uuid,
        role: UserRole,
        folder_id: Uuid,
    ) -> AppResult<AccessLevel> {
        if role.bypasses_folder_acl() {
            return Ok(AccessLevel::Manage);
        }

        Ok(self
            .grants
            .grant(user_id, folder_id)
            .await?
            .unwrap_or(AccessLevel::NoAccess))
    }

    /// Resolves and fails with `Forbidden` when the level is below `needed`.
    pub async fn require(
        &self,
        user_id: Uuid,
        role: UserRole,
        folder_id: Uuid,
        needed: AccessLevel,
    ) -> AppResult<AccessLevel> {
        let level = self.resolve(user_id, role, folder_id).await?;
        if level.is_granted() && level.has_at_least(needed) {
            Ok(level)
        } else {
            Err(AppError::forbidden(format!(
                "{needed} access to this folder is required"
            )))
        }
    }

    /// Folders on which `user_id` holds READ or MANAGE through an explicit grant.
    pub async fn permitted_folders(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, AccessLevel>> {
        Ok(self
            .grants
            .grants_for_user(user_id)
            .await?
            .into_iter()
            .filter(|grant| grant.access_level.is_granted())
            .map(|grant| (grant.folder_id, grant.access_level))
            .collect())
    }
}
