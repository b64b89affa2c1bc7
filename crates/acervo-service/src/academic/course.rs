//! Course CRUD.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use acervo_auth::rbac::{RbacEnforcer, SystemPermission};
use acervo_core::error::AppError;
use acervo_database::{CourseStore, UserLookup};
use acervo_entity::course::{Course, CourseSummary, CreateCourse, UpdateCourse};

use crate::context::RequestContext;

/// Manages the courses of an organization. Reading is open to every
/// member; writing needs the course management permission.
#[derive(Debug, Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseStore>,
    users: Arc<dyn UserLookup>,
    rbac: Arc<RbacEnforcer>,
}

impl CourseService {
    /// Creates a new course service.
    pub fn new(
        courses: Arc<dyn CourseStore>,
        users: Arc<dyn UserLookup>,
        rbac: Arc<RbacEnforcer>,
    ) -> Self {
        Self {
            courses,
            users,
            rbac,
        }
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<CourseSummary>, AppError> {
        self.courses.list(ctx.organization_id).await
    }

    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Course, AppError> {
        course_in_org(self.courses.as_ref(), ctx, id).await
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        coordinator_id: Option<Uuid>,
    ) -> Result<Course, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CourseManage)?;
        let name = course_name(name)?;
        if let Some(coordinator_id) = coordinator_id {
            self.require_member(ctx, coordinator_id).await?;
        }

        let course = self
            .courses
            .create(&CreateCourse {
                organization_id: ctx.organization_id,
                name: name.to_string(),
                coordinator_id,
            })
            .await?;

        info!(created_by = %ctx.user_id, course_id = %course.id, name = %course.name, "Course created");
        Ok(course)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        name: Option<String>,
        coordinator_id: Option<Uuid>,
    ) -> Result<Course, AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CourseManage)?;
        let course = course_in_org(self.courses.as_ref(), ctx, id).await?;
        let name = name
            .as_deref()
            .map(course_name)
            .transpose()?
            .map(str::to_string);
        if let Some(coordinator_id) = coordinator_id {
            self.require_member(ctx, coordinator_id).await?;
        }

        let updated = self
            .courses
            .update(
                course.id,
                &UpdateCourse {
                    name,
                    coordinator_id,
                },
            )
            .await?;

        info!(updated_by = %ctx.user_id, course_id = %updated.id, "Course updated");
        Ok(updated)
    }

    /// Soft-deletes a course. Its students and TCCs stay untouched.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.rbac
            .require_permission(ctx.role, SystemPermission::CourseManage)?;
        let course = course_in_org(self.courses.as_ref(), ctx, id).await?;
        if !self.courses.soft_delete(course.id).await? {
            return Err(AppError::not_found("Course not found"));
        }

        info!(deleted_by = %ctx.user_id, course_id = %course.id, "Course deleted");
        Ok(())
    }

    async fn require_member(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        user_in_org(self.users.as_ref(), ctx, user_id, "Coordinator not found").await?;
        Ok(())
    }
}

/// A live course of the caller's organization, or not found.
pub(crate) async fn course_in_org(
    courses: &dyn CourseStore,
    ctx: &RequestContext,
    id: Uuid,
) -> Result<Course, AppError> {
    courses
        .find(ctx.organization_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found"))
}

/// A user of the caller's organization, or not found with `missing`.
pub(crate) async fn user_in_org(
    users: &dyn UserLookup,
    ctx: &RequestContext,
    id: Uuid,
    missing: &str,
) -> Result<acervo_entity::user::User, AppError> {
    users
        .user(id)
        .await?
        .filter(|u| u.organization_id == ctx.organization_id)
        .ok_or_else(|| AppError::not_found(missing))
}

fn course_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Course name cannot be empty"));
    }
    Ok(name)
}
