//! Course repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_entity::course::{Course, CourseSummary, CreateCourse, UpdateCourse};

use crate::lookup::CourseStore;

/// Repository for courses. Deletes are soft.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Create a new course repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseStore for CourseRepository {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Course>> {
        sqlx::query_as::<_, Course>(
            "SELECT * FROM courses \
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find course", e))
    }

    async fn list(&self, organization_id: Uuid) -> AppResult<Vec<CourseSummary>> {
        sqlx::query_as::<_, CourseSummary>(
            "SELECT c.*, \
                u.first_name || ' ' || u.last_name AS coordinator_name, \
                (SELECT COUNT(*) FROM students s \
                  WHERE s.course_id = c.id AND s.deleted_at IS NULL) AS student_count, \
                (SELECT COUNT(*) FROM tccs t \
                  WHERE t.course_id = c.id AND t.deleted_at IS NULL) AS tcc_count \
             FROM courses c LEFT JOIN users u ON u.id = c.coordinator_id \
             WHERE c.organization_id = $1 AND c.deleted_at IS NULL \
             ORDER BY c.created_at DESC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list courses", e))
    }

    async fn create(&self, data: &CreateCourse) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO courses (organization_id, name, coordinator_id) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(data.organization_id)
        .bind(&data.name)
        .bind(data.coordinator_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create course", e))
    }

    async fn update(&self, id: Uuid, data: &UpdateCourse) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(
            "UPDATE courses SET \
                name = COALESCE($2, name), \
                coordinator_id = COALESCE($3, coordinator_id), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.coordinator_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update course", e))?
        .ok_or_else(|| AppError::not_found(format!("Course {id} not found")))
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE courses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete course", e))?;
        Ok(result.rows_affected() > 0)
    }
}
