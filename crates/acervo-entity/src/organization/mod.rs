//! Organization (tenant) entities.

pub mod model;

pub use model::{CreateOrganization, Organization, UpdateOrganization};
