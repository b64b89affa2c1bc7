//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tenant (e.g. a university) scoping users, folders and files.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: Uuid,
    /// Unique organization name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Inactive organizations keep their data but are hidden from listings.
    pub is_active: bool,
    /// Sum of the sizes of all files uploaded into this organization.
    pub used_storage_bytes: i64,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
    /// When the organization was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Organization name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial update of an organization. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganization {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}
