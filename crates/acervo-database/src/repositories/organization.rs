//! Organization repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_entity::organization::{CreateOrganization, Organization, UpdateOrganization};

use crate::lookup::StorageUsage;

/// Repository for organization CRUD and storage accounting.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an organization by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find organization", e)
            })
    }

    /// List organizations ordered by name.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Organization>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count organizations", e)
            })?;

        let items = sqlx::query_as::<_, Organization>(
            "SELECT * FROM organizations ORDER BY name ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list organizations", e)
        })?;

        Ok(PageResponse::new(items, *page, total as u64))
    }

    /// Create a new organization.
    pub async fn create(&self, data: &CreateOrganization) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, &data.name, "Failed to create organization"))
    }

    /// Update name and description.
    pub async fn update(&self, id: Uuid, data: &UpdateOrganization) -> AppResult<Organization> {
        let name = data.name.clone().unwrap_or_default();
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, &name, "Failed to update organization"))?
        .ok_or_else(|| AppError::not_found(format!("Organization {id} not found")))
    }

    /// Activate or deactivate an organization.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update organization", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Organization {id} not found")))
    }

    /// Delete an organization and, by cascade, everything it owns.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete organization", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl StorageUsage for OrganizationRepository {
    /// Never drops below zero.
    async fn add_used_storage(&self, organization_id: Uuid, delta: i64) -> AppResult<()> {
        sqlx::query(
            "UPDATE organizations SET used_storage_bytes = GREATEST(used_storage_bytes + $2, 0), \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(organization_id)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update storage usage", e)
        })?;
        Ok(())
    }
}

pub(crate) fn map_name_conflict(e: sqlx::Error, name: &str, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("organizations_name_key") =>
        {
            AppError::conflict(format!("Organization '{name}' already exists"))
        }
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}
