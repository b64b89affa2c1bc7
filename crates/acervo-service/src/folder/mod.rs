//! Folder operations: CRUD, tree, and search.

pub mod search;
pub mod service;
pub mod tree;

pub use search::{SearchResults, SearchService};
pub use service::{FolderContent, FolderService, WithAccess};
pub use tree::{TreeService, build_tree};
