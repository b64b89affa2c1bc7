//! TCC (thesis) domain entities.

pub mod kind;
pub mod model;

pub use kind::{TccFileKind, TccType};
pub use model::{CreateTcc, Tcc, TccFilter, TccRecord, UpdateTcc};
