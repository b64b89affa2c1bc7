//! Access history queries.

use std::sync::Arc;

use uuid::Uuid;

use acervo_auth::rbac::{RbacEnforcer, SystemPermission};
use acervo_core::error::AppError;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_database::FileStore;
use acervo_database::repositories::{AccessHistoryRepository, UserRepository};
use acervo_entity::audit::{AccessHistoryEntry, AccessHistoryFilter};

use crate::context::RequestContext;

/// Default page size of the general audit listing.
pub const AUDIT_PAGE_SIZE: u64 = 100;
/// Default page size of the per-file and per-user listings.
pub const SCOPED_AUDIT_PAGE_SIZE: u64 = 50;

/// Read side of the access history, restricted to the caller's organization.
#[derive(Debug, Clone)]
pub struct AuditService {
    history_repo: Arc<AccessHistoryRepository>,
    file_repo: Arc<dyn FileStore>,
    user_repo: Arc<UserRepository>,
    rbac: Arc<RbacEnforcer>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(
        history_repo: Arc<AccessHistoryRepository>,
        file_repo: Arc<dyn FileStore>,
        user_repo: Arc<UserRepository>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            history_repo,
            file_repo,
            user_repo,
            rbac,
        }
    }

    /// Filtered listing, newest first.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filter: &AccessHistoryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<AccessHistoryEntry>, AppError> {
        self.rbac.require_permission(ctx.role, SystemPermission::AuditView)?;

        if matches!((filter.start_date, filter.end_date), (Some(start), Some(end)) if start > end) {
            return Err(AppError::validation("start_date must not be after end_date"));
        }

        self.history_repo
            .search(ctx.organization_id, filter, &page)
            .await
    }

    /// History of one file.
    pub async fn for_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<AccessHistoryEntry>, AppError> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .filter(|f| f.organization_id == ctx.organization_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let filter = AccessHistoryFilter {
            file_id: Some(file.id),
            ..AccessHistoryFilter::default()
        };
        self.search(ctx, &filter, page).await
    }

    /// Actions performed by one user.
    pub async fn for_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<AccessHistoryEntry>, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .filter(|u| u.organization_id == ctx.organization_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let filter = AccessHistoryFilter {
            user_id: Some(user.id),
            ..AccessHistoryFilter::default()
        };
        self.search(ctx, &filter, page).await
    }
}
