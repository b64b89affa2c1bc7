//! Per-folder access resolution and the TCC role rules.

pub mod resolver;
pub mod tcc;

pub use resolver::FolderAccessResolver;
pub use tcc::{TccActor, TccScope};
