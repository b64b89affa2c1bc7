//! Outgoing email.

pub mod service;
pub mod templates;

pub use service::EmailService;
