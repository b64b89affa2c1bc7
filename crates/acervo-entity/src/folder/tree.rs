//! Folder tree node used by the organization tree endpoint.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A folder with its nested subfolders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Materialized path.
    pub path: String,
    /// Parent folder ID.
    pub parent_folder_id: Option<Uuid>,
    /// Whether at least one file lives directly in this folder.
    pub has_files: bool,
    /// Whether this folder has child folders.
    pub has_subfolders: bool,
    /// Child folders, ordered by name.
    pub subfolders: Vec<FolderNode>,
}
