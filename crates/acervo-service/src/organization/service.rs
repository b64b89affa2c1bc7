//! Organization CRUD.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use acervo_auth::rbac::{RbacEnforcer, SystemPermission};
use acervo_core::error::AppError;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_database::repositories::OrganizationRepository;
use acervo_entity::organization::{CreateOrganization, Organization, UpdateOrganization};

use crate::context::RequestContext;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Storage consumed by one organization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageUsageView {
    pub organization_id: Uuid,
    pub used_storage_bytes: i64,
    /// Binary gigabytes rounded to four decimals.
    pub used_gb: f64,
}

impl StorageUsageView {
    pub fn new(organization_id: Uuid, used_storage_bytes: i64) -> Self {
        let used_gb = (used_storage_bytes as f64 / BYTES_PER_GB * 10_000.0).round() / 10_000.0;
        Self {
            organization_id,
            used_storage_bytes,
            used_gb,
        }
    }
}

/// Manages organizations. Every operation except reading one's own
/// organization is reserved to admins.
#[derive(Debug, Clone)]
pub struct OrganizationService {
    org_repo: Arc<OrganizationRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl OrganizationService {
    /// Creates a new organization service.
    pub fn new(org_repo: Arc<OrganizationRepository>, rbac: Arc<RbacEnforcer>) -> Self {
        Self { org_repo, rbac }
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: Option<String>,
    ) -> Result<Organization, AppError> {
        self.require_manage(ctx)?;
        let name = validate_name(name)?;

        let org = self
            .org_repo
            .create(&CreateOrganization {
                name: name.to_string(),
                description,
            })
            .await?;

        info!(created_by = %ctx.user_id, organization_id = %org.id, name = %org.name, "Organization created");
        Ok(org)
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Organization>, AppError> {
        self.require_manage(ctx)?;
        self.org_repo.find_all(&page).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Organization, AppError> {
        if ctx.organization_id != id {
            self.require_manage(ctx)?;
        }
        self.org_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Organization not found"))
    }

    /// Storage used by an organization. Members read their own; other
    /// organizations need the manage permission.
    pub async fn storage_usage(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<StorageUsageView, AppError> {
        let org = self.get(ctx, id).await?;
        Ok(StorageUsageView::new(org.id, org.used_storage_bytes))
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Organization, AppError> {
        self.require_manage(ctx)?;
        let name = name
            .as_deref()
            .map(validate_name)
            .transpose()?
            .map(str::to_string);

        let org = self
            .org_repo
            .update(id, &UpdateOrganization { name, description })
            .await?;

        info!(updated_by = %ctx.user_id, organization_id = %org.id, "Organization updated");
        Ok(org)
    }

    /// Deletes an organization and everything it owns.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.require_manage(ctx)?;
        if ctx.organization_id == id {
            return Err(AppError::validation(
                "You cannot delete your own organization",
            ));
        }
        if !self.org_repo.delete(id).await? {
            return Err(AppError::not_found("Organization not found"));
        }

        info!(deleted_by = %ctx.user_id, organization_id = %id, "Organization deleted");
        Ok(())
    }

    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        is_active: bool,
    ) -> Result<Organization, AppError> {
        self.require_manage(ctx)?;
        let org = self.org_repo.set_active(id, is_active).await?;

        info!(changed_by = %ctx.user_id, organization_id = %id, is_active, "Organization activation changed");
        Ok(org)
    }

    fn require_manage(&self, ctx: &RequestContext) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::OrganizationManage)
    }
}

fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Organization name cannot be empty"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_usage_in_gigabytes() {
        let id = Uuid::new_v4();
        assert_eq!(StorageUsageView::new(id, 0).used_gb, 0.0);
        assert_eq!(StorageUsageView::new(id, 1024 * 1024 * 1024).used_gb, 1.0);
        // 1.5 MiB
        assert_eq!(StorageUsageView::new(id, 1_572_864).used_gb, 0.0015);
    }

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  UFSC ").unwrap(), "UFSC");
        assert!(validate_name("   ").is_err());
    }
}
