//! Access history (audit) entities.

pub mod action;
pub mod model;

pub use action::AuditAction;
pub use model::{AccessHistoryEntry, AccessHistoryFilter, AuditTarget, CreateAccessHistoryEntry};
