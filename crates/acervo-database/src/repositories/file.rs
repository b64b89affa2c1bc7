//! File repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_entity::file::{CreateFile, File};

use super::folder::like_pattern;
use crate::lookup::FileStore;

/// Repository for file metadata.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE folder_id = $1 ORDER BY display_name ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folder files", e))
    }

    async fn find_in_folders(&self, folder_ids: &[Uuid]) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE folder_id = ANY($1)")
            .bind(folder_ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list subtree files", e)
            })
    }

    async fn find_by_organization(
        &self,
        organization_id: Uuid,
        folder_ids: Option<&[Uuid]>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<File>> {
        let scope = folder_ids.map(|ids| ids.to_vec());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM files \
             WHERE organization_id = $1 AND ($2::uuid[] IS NULL OR folder_id = ANY($2))",
        )
        .bind(organization_id)
        .bind(&scope)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;

        let files = sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE organization_id = $1 AND ($2::uuid[] IS NULL OR folder_id = ANY($2)) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(organization_id)
        .bind(&scope)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))?;

        Ok(PageResponse::new(files, *page, total as u64))
    }

    async fn search(
        &self,
        organization_id: Uuid,
        scope: Option<&[Uuid]>,
        term: &str,
    ) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE organization_id = $1 \
               AND ($2::uuid[] IS NULL OR folder_id = ANY($2)) \
               AND (filename ILIKE $3 OR display_name ILIKE $3) \
             ORDER BY path ASC",
        )
        .bind(organization_id)
        .bind(scope.map(|s| s.to_vec()))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search files", e))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files \
                (filename, display_name, path, mime_type, size_bytes, folder_id, organization_id, uploaded_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&data.filename)
        .bind(&data.display_name)
        .bind(&data.path)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .bind(data.folder_id)
        .bind(data.organization_id)
        .bind(data.uploaded_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("files_filename_key") =>
            {
                AppError::conflict(format!("Storage key '{}' already exists", data.filename))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })
    }

    async fn update_display_name(&self, id: Uuid, display_name: &str) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET display_name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn move_to(&self, id: Uuid, folder_id: Uuid, path: &str) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET folder_id = $2, path = $3, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(folder_id)
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn delete_with_history(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM access_history WHERE file_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete file history", e)
            })?;

        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
