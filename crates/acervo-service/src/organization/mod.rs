//! Organization management.

pub mod service;

pub use service::{OrganizationService, StorageUsageView};
