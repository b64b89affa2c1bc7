//! File operations: upload, metadata, download, and lifecycle.

pub mod download;
pub mod service;
pub mod upload;

pub use download::{Download, DownloadService};
pub use service::{FileDetails, FileService, FileView};
pub use upload::{UploadService, UploadedPart, storage_key};
