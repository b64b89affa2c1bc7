//! # acervo-database
//!
//! PostgreSQL connection management, embedded migrations, and concrete
//! repository implementations for all Acervo entities.
//!
//! The [`lookup`] module holds the traits services depend on. The
//! repositories implement them; tests substitute in-memory fakes.

pub mod connection;
pub mod lookup;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use lookup::{
    AccessHistorySink, CourseStore, FileStore, FolderLookup, FolderStore, PermissionLookup,
    StorageUsage, StudentConflict, StudentStore, TccStore, UserLookup,
};
