//! Student repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use acervo_core::error::{AppError, ErrorKind};
use acervo_core::result::AppResult;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_entity::student::{CreateStudent, Student, StudentSummary, UpdateStudent};

use crate::lookup::{StudentConflict, StudentStore};

/// Repository for students. Deletes are soft and cascade to TCCs.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    /// Create a new student repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for StudentRepository {
    async fn find(&self, organization_id: Uuid, id: Uuid) -> AppResult<Option<Student>> {
        sqlx::query_as::<_, Student>(
            "SELECT * FROM students \
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find student", e))
    }

    async fn list(
        &self,
        organization_id: Uuid,
        course_id: Option<Uuid>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<StudentSummary>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students \
             WHERE organization_id = $1 AND deleted_at IS NULL \
             AND ($2::uuid IS NULL OR course_id = $2)",
        )
        .bind(organization_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count students", e))?;

        let students = sqlx::query_as::<_, StudentSummary>(
            "SELECT s.*, c.name AS course_name, \
                (SELECT COUNT(*) FROM tccs t \
                  WHERE t.author_id = s.id AND t.deleted_at IS NULL) AS tcc_count \
             FROM students s JOIN courses c ON c.id = s.course_id \
             WHERE s.organization_id = $1 AND s.deleted_at IS NULL \
             AND ($2::uuid IS NULL OR s.course_id = $2) \
             ORDER BY s.first_name ASC, s.last_name ASC LIMIT $3 OFFSET $4",
        )
        .bind(organization_id)
        .bind(course_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list students", e))?;

        Ok(PageResponse::new(students, *page, total as u64))
    }

    async fn find_conflict(
        &self,
        organization_id: Uuid,
        email: &str,
        student_number: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<StudentConflict>> {
        let clash: Option<(bool,)> = sqlx::query_as(
            "SELECT LOWER(email) = LOWER($2) FROM students \
             WHERE organization_id = $1 AND deleted_at IS NULL \
             AND (LOWER(email) = LOWER($2) OR student_number = $3) \
             AND ($4::uuid IS NULL OR id <> $4) \
             LIMIT 1",
        )
        .bind(organization_id)
        .bind(email)
        .bind(student_number)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check student uniqueness", e)
        })?;

        Ok(clash.map(|(email_clash,)| {
            if email_clash {
                StudentConflict::Email
            } else {
                StudentConflict::StudentNumber
            }
        }))
    }

    async fn create(&self, data: &CreateStudent) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            "INSERT INTO students \
                (organization_id, course_id, first_name, last_name, email, student_number) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(data.organization_id)
        .bind(data.course_id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.student_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_student_conflict(e, "Failed to create student"))
    }

    async fn update(&self, id: Uuid, data: &UpdateStudent) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(
            "UPDATE students SET \
                course_id = COALESCE($2, course_id), \
                first_name = COALESCE($3, first_name), \
                last_name = COALESCE($4, last_name), \
                email = COALESCE($5, email), \
                student_number = COALESCE($6, student_number), \
                updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(data.course_id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.student_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_student_conflict(e, "Failed to update student"))?
        .ok_or_else(|| AppError::not_found(format!("Student {id} not found")))
    }

    async fn soft_delete_with_tccs(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(
            "UPDATE tccs SET deleted_at = NOW() WHERE author_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete student TCCs", e))?;

        let result = sqlx::query(
            "UPDATE students SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete student", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}

/// The partial unique indexes back the service-level duplicate check.
fn map_student_conflict(e: sqlx::Error, context: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) => match db_err.constraint() {
            Some("students_email_key") => {
                AppError::validation("A student with this email already exists")
            }
            Some("students_student_number_key") => {
                AppError::validation("A student with this student number already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
        },
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}
