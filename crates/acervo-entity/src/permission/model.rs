//! Folder permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::level::AccessLevel;

/// An explicit grant of an access level to one user on one folder.
///
/// `(user_id, folder_id)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FolderPermission {
    /// Unique grant identifier.
    pub id: Uuid,
    /// Grantee.
    pub user_id: Uuid,
    /// Folder the grant applies to.
    pub folder_id: Uuid,
    /// Granted level.
    pub access_level: AccessLevel,
    /// When the grant was created.
    pub created_at: DateTime<Utc>,
    /// When the grant was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create or replace a grant.
#[derive(Debug, Clone)]
pub struct UpsertFolderPermission {
    /// Grantee.
    pub user_id: Uuid,
    /// Folder.
    pub folder_id: Uuid,
    /// Level to grant.
    pub access_level: AccessLevel,
}
