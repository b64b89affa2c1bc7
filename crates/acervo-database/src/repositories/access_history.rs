//! Access history repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_entity::audit::{AccessHistoryEntry, AccessHistoryFilter, CreateAccessHistoryEntry};

use crate::lookup::AccessHistorySink;

/// Repository for the append-only access history table.
#[derive(Debug, Clone)]
pub struct AccessHistoryRepository {
    pool: PgPool,
}

impl AccessHistoryRepository {
    /// Create a new access history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Search entries of one organization, newest first.
    ///
    /// Entries belong to an organization through their acting user.
    pub async fn search(
        &self,
        organization_id: Uuid,
        filter: &AccessHistoryFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AccessHistoryEntry>> {
        let mut conditions = vec!["u.organization_id = $1".to_string()];
        let mut param_idx = 2u32;

        if filter.user_id.is_some() {
            conditions.push(format!("h.accessed_by = ${param_idx}"));
            param_idx += 1;
        }
        if filter.file_id.is_some() {
            conditions.push(format!("h.file_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.folder_id.is_some() {
            conditions.push(format!("h.folder_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.action.is_some() {
            conditions.push(format!("h.action_performed = ${param_idx}"));
            param_idx += 1;
        }
        if filter.start_date.is_some() {
            conditions.push(format!("h.accessed_at >= ${param_idx}"));
            param_idx += 1;
        }
        if filter.end_date.is_some() {
            conditions.push(format!("h.accessed_at <= ${param_idx}"));
            param_idx += 1;
        }

        let from_clause = format!(
            "FROM access_history h JOIN users u ON u.id = h.accessed_by WHERE {}",
            conditions.join(" AND ")
        );
        let count_sql = format!("SELECT COUNT(*) {from_clause}");
        let select_sql = format!(
            "SELECT h.* {from_clause} ORDER BY h.accessed_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(organization_id);
        let mut select_query =
            sqlx::query_as::<_, AccessHistoryEntry>(&select_sql).bind(organization_id);

        if let Some(user_id) = filter.user_id {
            count_query = count_query.bind(user_id);
            select_query = select_query.bind(user_id);
        }
        if let Some(file_id) = filter.file_id {
            count_query = count_query.bind(file_id);
            select_query = select_query.bind(file_id);
        }
        if let Some(folder_id) = filter.folder_id {
            count_query = count_query.bind(folder_id);
            select_query = select_query.bind(folder_id);
        }
        if let Some(action) = filter.action {
            count_query = count_query.bind(action);
            select_query = select_query.bind(action);
        }
        if let Some(start) = filter.start_date {
            count_query = count_query.bind(start);
            select_query = select_query.bind(start);
        }
        if let Some(end) = filter.end_date {
            count_query = count_query.bind(end);
            select_query = select_query.bind(end);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count access history", e)
        })?;

        let entries = select_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search access history", e)
            })?;

        Ok(PageResponse::new(entries, *page, total as u64))
    }
}

#[async_trait]
impl AccessHistorySink for AccessHistoryRepository {
    async fn append(&self, entry: &CreateAccessHistoryEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO access_history (accessed_by, file_id, folder_id, action_performed, accessed_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entry.accessed_by)
        .bind(entry.target.file_id())
        .bind(entry.target.folder_id())
        .bind(entry.action)
        .bind(entry.accessed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append access history", e)
        })?;
        Ok(())
    }
}
