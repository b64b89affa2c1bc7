//! Access history: recording and querying.

pub mod recorder;
pub mod service;

pub use recorder::AuditRecorder;
pub use service::AuditService;
