//! Folder permission entities.

pub mod level;
pub mod model;

pub use level::AccessLevel;
pub use model::{FolderPermission, UpsertFolderPermission};
