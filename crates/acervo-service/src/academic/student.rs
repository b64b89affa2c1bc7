//! Student CRUD.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use acervo_core::error::AppError;
use acervo_core::types::pagination::{PageRequest, PageResponse};
use acervo_database::{CourseStore, StudentConflict, StudentStore};
use acervo_entity::student::{CreateStudent, Student, StudentSummary, UpdateStudent};

use super::course::course_in_org;
use super::course_scope;
use crate::context::RequestContext;
use crate::user::service::{normalize_email, optional, required};

/// Input for enrolling a student.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub course_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_number: String,
}

/// Partial update of a student.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdate {
    pub course_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub student_number: Option<String>,
}

/// Manages students. Writing follows the TCC rules of the student's
/// course; deleting also removes the student's TCCs.
#[derive(Debug, Clone)]
pub struct StudentService {
    students: Arc<dyn StudentStore>,
    courses: Arc<dyn CourseStore>,
}

impl StudentService {
    /// Creates a new student service.
    pub fn new(students: Arc<dyn StudentStore>, courses: Arc<dyn CourseStore>) -> Self {
        Self { students, courses }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        course_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<PageResponse<StudentSummary>, AppError> {
        self.students
            .list(ctx.organization_id, course_id, &page)
            .await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Student, AppError> {
        student_in_org(self.students.as_ref(), ctx, id).await
    }

    pub async fn create(&self, ctx: &RequestContext, input: NewStudent) -> Result<Student, AppError> {
        let course = course_in_org(self.courses.as_ref(), ctx, input.course_id).await?;
        ctx.tcc_actor().require_modify(&course_scope(&course))?;

        let first_name = required(&input.first_name, "first_name")?;
        let last_name = required(&input.last_name, "last_name")?;
        let email = normalize_email(&input.email)?;
        let student_number = required(&input.student_number, "student_number")?;

        self.require_unique(ctx, &email, student_number, None)
            .await?;

        let student = self
            .students
            .create(&CreateStudent {
                organization_id: ctx.organization_id,
                course_id: course.id,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                student_number: student_number.to_string(),
            })
            .await?;

        info!(created_by = %ctx.user_id, student_id = %student.id, course_id = %course.id, "Student created");
        Ok(student)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: StudentUpdate,
    ) -> Result<Student, AppError> {
        let student = student_in_org(self.students.as_ref(), ctx, id).await?;
        let course = course_in_org(self.courses.as_ref(), ctx, student.course_id).await?;
        let actor = ctx.tcc_actor();
        actor.require_modify(&course_scope(&course))?;

        if let Some(course_id) = input.course_id.filter(|c| *c != student.course_id) {
            let target = course_in_org(self.courses.as_ref(), ctx, course_id).await?;
            actor.require_modify(&course_scope(&target))?;
        }

        let email = input.email.as_deref().map(normalize_email).transpose()?;
        let student_number = input
            .student_number
            .as_deref()
            .map(|n| required(n, "student_number"))
            .transpose()?
            .map(str::to_string);

        if email.is_some() || student_number.is_some() {
            let email = email.as_deref().unwrap_or(&student.email);
            let number = student_number.as_deref().unwrap_or(&student.student_number);
            self.require_unique(ctx, email, number, Some(student.id))
                .await?;
        }

        let updated = self
            .students
            .update(
                student.id,
                &UpdateStudent {
                    course_id: input.course_id,
                    first_name: optional(input.first_name),
                    last_name: optional(input.last_name),
                    email,
                    student_number,
                },
            )
            .await?;

        info!(updated_by = %ctx.user_id, student_id = %updated.id, "Student updated");
        Ok(updated)
    }

    /// Soft-deletes a student and every TCC they authored.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let student = student_in_org(self.students.as_ref(), ctx, id).await?;
        let course = course_in_org(self.courses.as_ref(), ctx, student.course_id).await?;
        ctx.tcc_actor().require_delete(&course_scope(&course))?;

        if !self.students.soft_delete_with_tccs(student.id).await? {
            return Err(AppError::not_found("Student not found"));
        }

        info!(deleted_by = %ctx.user_id, student_id = %student.id, "Student deleted");
        Ok(())
    }

    async fn require_unique(
        &self,
        ctx: &RequestContext,
        email: &str,
        student_number: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), AppError> {
        match self
            .students
            .find_conflict(ctx.organization_id, email, student_number, exclude)
            .await?
        {
            Some(StudentConflict::Email) => Err(AppError::validation(
                "A student with this email already exists",
            )),
            Some(StudentConflict::StudentNumber) => Err(AppError::validation(
                "A student with this student number already exists",
            )),
            None => Ok(()),
        }
    }
}

/// A live student of the caller's organization, or not found.
pub(crate) async fn student_in_org(
    students: &dyn StudentStore,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<Student, AppError> {
    students
        .find(ctx.organization_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Student not found"))
}
