//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, Folder, PATH_SEPARATOR};
pub use tree::FolderNode;
