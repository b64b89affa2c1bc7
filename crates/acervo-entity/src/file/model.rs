//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata of an object stored in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// Storage key; generated on upload and never changed.
    pub filename: String,
    /// User-facing name.
    pub display_name: String,
    /// Materialized path: the folder path followed by the storage key.
    pub path: String,
    /// MIME type reported at upload.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Containing folder.
    pub folder_id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// The user who uploaded the file (or inherited it on user deletion).
    pub uploaded_by: Uuid,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the file metadata was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register an uploaded file.
#[derive(Debug, Clone)]
pub struct CreateFile {
    /// Storage key.
    pub filename: String,
    /// User-facing name.
    pub display_name: String,
    /// Materialized path.
    pub path: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Containing folder.
    pub folder_id: Uuid,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Uploader.
    pub uploaded_by: Uuid,
}
