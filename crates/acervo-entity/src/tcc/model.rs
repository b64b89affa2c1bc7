//! TCC entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::{TccFileKind, TccType};

/// A final course work: the thesis metadata and its stored files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tcc {
    /// Unique TCC identifier.
    pub id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    pub title: String,
    /// Defense year.
    pub year: i32,
    /// Free-form keywords.
    pub keywords: Option<String>,
    pub tcc_type: TccType,
    /// Authoring student.
    pub author_id: Uuid,
    /// Supervising user; cleared when that user is deleted.
    pub supervisor_id: Option<Uuid>,
    pub course_id: Uuid,
    /// The thesis document. Cleared if the file is deleted.
    pub file_id: Option<Uuid>,
    /// The defense record, attached after the defense.
    pub defense_record_file_id: Option<Uuid>,
    /// When the TCC was registered.
    pub created_at: DateTime<Utc>,
    /// When the TCC was last updated.
    pub updated_at: DateTime<Utc>,
    /// Set on soft delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tcc {
    /// The file id attached for `kind`, if any.
    pub fn file_for(&self, kind: TccFileKind) -> Option<Uuid> {
        match kind {
            TccFileKind::Main => self.file_id,
            TccFileKind::Defense => self.defense_record_file_id,
        }
    }
}

/// A TCC joined with the names it references and its course coordinator.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TccRecord {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub tcc: Tcc,
    pub author_name: String,
    pub student_number: String,
    pub supervisor_name: Option<String>,
    pub course_name: String,
    /// Coordinator of the TCC's course; decides coordinator access.
    pub coordinator_id: Option<Uuid>,
}

/// Data required to register a TCC.
#[derive(Debug, Clone)]
pub struct CreateTcc {
    pub organization_id: Uuid,
    pub title: String,
    pub year: i32,
    pub keywords: Option<String>,
    pub tcc_type: TccType,
    pub author_id: Uuid,
    pub supervisor_id: Option<Uuid>,
    pub course_id: Uuid,
    pub file_id: Uuid,
    pub defense_record_file_id: Option<Uuid>,
}

/// Partial update of a TCC. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTcc {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub keywords: Option<String>,
    pub tcc_type: Option<TccType>,
    pub author_id: Option<Uuid>,
    pub supervisor_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub defense_record_file_id: Option<Uuid>,
}

/// Listing filters. Every set field narrows the result.
#[derive(Debug, Clone, Default)]
pub struct TccFilter {
    /// Substring of title, keywords, author, supervisor or course name.
    pub search: Option<String>,
    pub tcc_type: Option<TccType>,
    pub year: Option<i32>,
    pub course_id: Option<Uuid>,
    /// Restricts to courses coordinated by this user.
    pub coordinator_id: Option<Uuid>,
}
