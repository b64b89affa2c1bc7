//! Materialized folder and file paths.

pub mod builder;
pub mod scope;

pub use builder::{build_path, file_path};
pub use scope::{descendant_scope, subtree_paths};
