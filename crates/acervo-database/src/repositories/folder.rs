//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_entity::folder::{CreateFolder, Folder};

use crate::lookup::{FolderLookup, FolderStore};

/// Repository for folder CRUD, hierarchy lookups and subtree path rewrites.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = ANY($1) ORDER BY path ASC")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folders", e))
    }

    async fn exists_sibling(
        &self,
        organization_id: Uuid,
        parent_folder_id: Option<Uuid>,
        name: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM folders \
             WHERE organization_id = $1 AND parent_folder_id IS NOT DISTINCT FROM $2 AND name = $3)",
        )
        .bind(organization_id)
        .bind(parent_folder_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check folder name", e)
        })
    }

    async fn find_by_organization(&self, organization_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE organization_id = $1 ORDER BY path ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list organization folders", e)
        })
    }

    async fn find_children(&self, parent_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_folder_id = $1 ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn search(
        &self,
        organization_id: Uuid,
        scope: Option<&[Uuid]>,
        term: &str,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE organization_id = $1 \
               AND ($2::uuid[] IS NULL OR id = ANY($2)) \
               AND name ILIKE $3 \
             ORDER BY path ASC",
        )
        .bind(organization_id)
        .bind(scope.map(|s| s.to_vec()))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search folders", e))
    }

    async fn ids_with_files(&self, organization_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT DISTINCT folder_id FROM files WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list non-empty folders", e)
        })
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (name, path, parent_folder_id, organization_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.parent_folder_id)
        .bind(data.organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    async fn relocate(
        &self,
        folder_id: Uuid,
        name: &str,
        parent_folder_id: Option<Uuid>,
        folder_paths: &[(Uuid, String)],
    ) -> AppResult<Folder> {
        let (ids, paths): (Vec<Uuid>, Vec<String>) = folder_paths.iter().cloned().unzip();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let moved = sqlx::query(
            "UPDATE folders SET name = $2, parent_folder_id = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(folder_id)
        .bind(name)
        .bind(parent_folder_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move folder", e))?;

        if moved.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        sqlx::query(
            "UPDATE folders AS f SET path = v.path, updated_at = NOW() \
             FROM UNNEST($1::uuid[], $2::text[]) AS v(id, path) \
             WHERE f.id = v.id",
        )
        .bind(&ids)
        .bind(&paths)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rewrite folder paths", e)
        })?;

        sqlx::query(
            "UPDATE files AS fi SET path = fo.path || '/' || fi.filename, updated_at = NOW() \
             FROM folders AS fo \
             WHERE fi.folder_id = fo.id AND fo.id = ANY($1)",
        )
        .bind(&ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rewrite file paths", e)
        })?;

        let folder = sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(folder_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reload folder", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(folder)
    }

    async fn delete(&self, folder_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FolderLookup for FolderRepository {
    async fn folder(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn child_folder_ids(&self, parent_ids: &[Uuid]) -> AppResult<Vec<(Uuid, Uuid)>> {
        sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT id, parent_folder_id FROM folders WHERE parent_folder_id = ANY($1)",
        )
        .bind(parent_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list child ids", e))
    }
}

/// `%term%` with LIKE wildcards in `term` escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("tcc"), "%tcc%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }
}
