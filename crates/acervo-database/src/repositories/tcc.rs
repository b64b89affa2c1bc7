//! TCC repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_entity::tcc::{CreateTcc, Tcc, TccFilter, TccRecord, UpdateTcc};

use super::folder::like_pattern;
use crate::lookup::TccStore;

const RECORD_SELECT: &str = "SELECT t.*, \
        s.first_name || ' ' || s.last_name AS author_name, \
        s.student_number, \
        u.first_name || ' ' || u.last_name AS supervisor_name, \
        c.name AS course_name, \
        c.coordinator_id";

const RECORD_FROM: &str = "FROM tccs t \
        JOIN students s ON s.id = t.author_id \
        JOIN courses c ON c.id = t.course_id \
        LEFT JOIN users u ON u.id = t.supervisor_id";

/// Repository for TCCs. Deletes are soft.
#[derive(Debug, Clone)]
pub struct TccRepository {
    pool: PgPool,
}

impl TccRepository {
    /// Create a new TCC repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TccStore for TccRepository {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<TccRecord>> {
        let sql = format!(
            "{RECORD_SELECT} {RECORD_FROM} \
             WHERE t.id = $1 AND t.organization_id = $2 AND t.deleted_at IS NULL"
        );
        sqlx::query_as::<_, TccRecord>(&sql)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find TCC", e))
    }

    async fn list(
        &self,
        organization_id: Uuid,
        filter: &TccFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<TccRecord>> {
        let mut conditions = vec![
            "t.organization_id = $1".to_string(),
            "t.deleted_at IS NULL".to_string(),
        ];
        let mut param_idx = 2u32;

        if filter.search.is_some() {
            conditions.push(format!(
                "(t.title ILIKE ${p} OR t.keywords ILIKE ${p} \
                  OR s.first_name ILIKE ${p} OR s.last_name ILIKE ${p} \
                  OR s.student_number ILIKE ${p} \
                  OR u.first_name ILIKE ${p} OR u.last_name ILIKE ${p} \
                  OR c.name ILIKE ${p})",
                p = param_idx
            ));
            param_idx += 1;
        }
        if filter.tcc_type.is_some() {
            conditions.push(format!("t.tcc_type = ${param_idx}"));
            param_idx += 1;
        }
        if filter.year.is_some() {
            conditions.push(format!("t.year = ${param_idx}"));
            param_idx += 1;
        }
        if filter.course_id.is_some() {
            conditions.push(format!("t.course_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.coordinator_id.is_some() {
            conditions.push(format!("c.coordinator_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = conditions.join(" AND ");
        let count_sql = format!("SELECT COUNT(*) {RECORD_FROM} WHERE {where_clause}");
        let select_sql = format!(
            "{RECORD_SELECT} {RECORD_FROM} WHERE {where_clause} \
             ORDER BY t.created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(organization_id);
        let mut select_query = sqlx::query_as::<_, TccRecord>(&select_sql).bind(organization_id);

        if let Some(search) = &filter.search {
            let pattern = like_pattern(search);
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern);
        }
        if let Some(tcc_type) = filter.tcc_type {
            count_query = count_query.bind(tcc_type);
            select_query = select_query.bind(tcc_type);
        }
        if let Some(year) = filter.year {
            count_query = count_query.bind(year);
            select_query = select_query.bind(year);
        }
        if let Some(course_id) = filter.course_id {
            count_query = count_query.bind(course_id);
            select_query = select_query.bind(course_id);
        }
        if let Some(coordinator_id) = filter.coordinator_id {
            count_query = count_query.bind(coordinator_id);
            select_query = select_query.bind(coordinator_id);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count TCCs", e))?;

        let tccs = select_query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list TCCs", e))?;

        Ok(PageResponse::new(tccs, *page, total as u64))
    }

    async fn create(&self, data: &CreateTcc) -> AppResult<Tcc> {
        sqlx::query_as::<_, Tcc>(
            "INSERT INTO tccs \
                (organization_id, title, year, keywords, tcc_type, author_id, \
                 supervisor_id, course_id, file_id, defense_record_file_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(data.organization_id)
        .bind(&data.title)
        .bind(data.year)
        .bind(&data.keywords)
        .bind(data.tcc_type)
        .bind(data.author_id)
        .bind(data.supervisor_id)
        .bind(data.course_id)
        .bind(data.file_id)
        .bind(data.defense_record_file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create TCC", e))
    }

    async fn update(&self, id: Uuid, data: &UpdateTcc) -> AppResult<Tcc> {
        sqlx::query_as::<_, Tcc>(
            "UPDATE tccs SET \
                title = COALESCE($2, title), \
                year = COALESCE($3, year), \
                keywords = COALESCE($4, keywords), \
                tcc_type = COALESCE($5, tcc_type), \
                author_id = COALESCE($6, author_id), \
                supervisor_id = COALESCE($7, supervisor_id), \
                course_id = COALESCE($8, course_id), \
                defense_record_file_id = COALESCE($9, defense_record_file_id), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(data.year)
        .bind(&data.keywords)
        .bind(data.tcc_type)
        .bind(data.author_id)
        .bind(data.supervisor_id)
        .bind(data.course_id)
        .bind(data.defense_record_file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update TCC", e))?
        .ok_or_else(|| AppError::not_found(format!("TCC {id} not found")))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE tccs SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete TCC", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
