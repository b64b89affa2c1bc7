//! Course entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An academic course. Its coordinator scopes which TCCs a
/// COURSE_COORDENATOR may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    /// Unique course identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Course name.
    pub name: String,
    /// Coordinating user; cleared when that user is deleted.
    pub coordinator_id: Option<Uuid>,
    /// When the course was created.
    pub created_at: DateTime<Utc>,
    /// When the course was last updated.
    pub updated_at: DateTime<Utc>,
    /// Set on soft delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A course with live student and TCC counts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub course: Course,
    /// Name of the coordinator, when one is set.
    pub coordinator_name: Option<String>,
    pub student_count: i64,
    pub tcc_count: i64,
}

/// Data required to create a course.
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub organization_id: Uuid,
    pub name: String,
    pub coordinator_id: Option<Uuid>,
}

/// Partial update of a course. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourse {
    pub name: Option<String>,
    pub coordinator_id: Option<Uuid>,
}
