//! Student entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A student enrolled in one course. Students author TCCs; they are not
/// users and never log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Student {
    /// Unique student identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Enrolled course.
    pub course_id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email, unique among live students of the organization.
    pub email: String,
    /// Registration number, unique among live students of the organization.
    pub student_number: String,
    /// When the student was created.
    pub created_at: DateTime<Utc>,
    /// When the student was last updated.
    pub updated_at: DateTime<Utc>,
    /// Set on soft delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Student {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A student with the name of their course and their live TCC count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub student: Student,
    pub course_name: String,
    pub tcc_count: i64,
}

/// Data required to create a student.
#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub organization_id: Uuid,
    pub course_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub student_number: String,
}

/// Partial update of a student. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateStudent {
    pub course_id: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub student_number: Option<String>,
}
