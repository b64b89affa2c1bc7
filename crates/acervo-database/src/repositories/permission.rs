//! Folder permission repository implementation.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_entity::permission::{AccessLevel, FolderPermission, UpsertFolderPermission};

use crate::lookup::PermissionLookup;

/// Repository for explicit folder grants.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the grant for a `(user, folder)` pair.
    pub async fn find(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<Option<FolderPermission>> {
        sqlx::query_as::<_, FolderPermission>(
            "SELECT * FROM folder_permissions WHERE user_id = $1 AND folder_id = $2",
        )
        .bind(user_id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find permission", e))
    }

    /// Every grant held by a user.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<FolderPermission>> {
        sqlx::query_as::<_, FolderPermission>(
            "SELECT * FROM folder_permissions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user permissions", e)
        })
    }

    /// Every grant on a folder.
    pub async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<FolderPermission>> {
        sqlx::query_as::<_, FolderPermission>(
            "SELECT * FROM folder_permissions WHERE folder_id = $1 ORDER BY created_at ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folder permissions", e)
        })
    }

    /// Create or replace a grant. Returns the row and whether it was newly created.
    pub async fn upsert(&self, data: &UpsertFolderPermission) -> AppResult<(FolderPermission, bool)> {
        let row = sqlx::query(
            "INSERT INTO folder_permissions (user_id, folder_id, access_level) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT folder_permissions_user_folder_key \
             DO UPDATE SET access_level = EXCLUDED.access_level, updated_at = NOW() \
             RETURNING *, (xmax = 0) AS inserted",
        )
        .bind(data.user_id)
        .bind(data.folder_id)
        .bind(data.access_level)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert permission", e))?;

        let permission = FolderPermission::from_row(&row).map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decode permission", e)
        })?;
        let inserted: bool = row.try_get("inserted").map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to decode permission", e)
        })?;

        Ok((permission, inserted))
    }

    /// Remove a grant.
    pub async fn delete(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM folder_permissions WHERE user_id = $1 AND folder_id = $2")
                .bind(user_id)
                .bind(folder_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete permission", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PermissionLookup for PermissionRepository {
    async fn grant(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<Option<AccessLevel>> {
        Ok(self.find(user_id, folder_id).await?.map(|p| p.access_level))
    }

    async fn grants_for_user(&self, user_id: Uuid) -> AppResult<Vec<FolderPermission>> {
        self.find_by_user(user_id).await
    }
}
