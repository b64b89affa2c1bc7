//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Separator used in materialized paths.
pub const PATH_SEPARATOR: char = '/';

/// A folder in an organization's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name (never contains `/`).
    pub name: String,
    /// Materialized path: ancestor names and this name, joined by `/`.
    pub path: String,
    /// Parent folder ID (null for root folders).
    pub parent_folder_id: Option<Uuid>,
    /// Owning organization.
    pub organization_id: Uuid,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Path of a direct child entry named `child_name`.
    pub fn child_path(&self, child_name: &str) -> String {
        format!("{}{PATH_SEPARATOR}{child_name}", self.path)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Materialized path, computed before insert.
    pub path: String,
    /// Parent folder (None for root).
    pub parent_folder_id: Option<Uuid>,
    /// Owning organization.
    pub organization_id: Uuid,
}
