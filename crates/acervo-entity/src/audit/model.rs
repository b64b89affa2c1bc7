//! Access history entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::AuditAction;

/// An immutable record of who did what to which file or folder, and when.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessHistoryEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The acting user.
    pub accessed_by: Uuid,
    /// Target file, for file actions.
    pub file_id: Option<Uuid>,
    /// Target folder, for folder actions.
    pub folder_id: Option<Uuid>,
    /// What was done.
    pub action_performed: AuditAction,
    /// When it happened.
    pub accessed_at: DateTime<Utc>,
}

/// The entity an audit entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum AuditTarget {
    /// A file.
    File(Uuid),
    /// A folder.
    Folder(Uuid),
}

impl AuditTarget {
    /// The file id, if this target is a file.
    pub fn file_id(&self) -> Option<Uuid> {
        match self {
            Self::File(id) => Some(*id),
            Self::Folder(_) => None,
        }
    }

    /// The folder id, if this target is a folder.
    pub fn folder_id(&self) -> Option<Uuid> {
        match self {
            Self::Folder(id) => Some(*id),
            Self::File(_) => None,
        }
    }
}

/// Data required to append an access history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccessHistoryEntry {
    /// The acting user.
    pub accessed_by: Uuid,
    /// Target entity.
    pub target: AuditTarget,
    /// What was done.
    pub action: AuditAction,
    /// When it happened (captured at the call site, not at insert).
    pub accessed_at: DateTime<Utc>,
}

/// Filters for access history queries. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessHistoryFilter {
    /// Restrict to one acting user.
    pub user_id: Option<Uuid>,
    /// Restrict to one file.
    pub file_id: Option<Uuid>,
    /// Restrict to one folder.
    pub folder_id: Option<Uuid>,
    /// Restrict to one action.
    pub action: Option<AuditAction>,
    /// Inclusive lower bound on `accessed_at`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `accessed_at`.
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_ids() {
        let id = Uuid::new_v4();
        assert_eq!(AuditTarget::File(id).file_id(), Some(id));
        assert_eq!(AuditTarget::File(id).folder_id(), None);
        assert_eq!(AuditTarget::Folder(id).folder_id(), Some(id));
    }
}
