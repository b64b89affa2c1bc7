//! Storage provider trait for pluggable object storage backends.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for object storage backends.
///
/// Implementations exist for the local filesystem and S3. A missing
/// object is reported as [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound)
/// so callers can tell it apart from a failing backend.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read an object and return its byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Write bytes under the given key.
    async fn write(&self, path: &str, data: Bytes, content_type: Option<&str>) -> AppResult<()>;

    /// Delete the object under the given key.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether an object exists under the given key.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Produce a time-limited URL from which the object can be fetched.
    ///
    /// Backends that cannot hand out direct URLs return `None`; callers
    /// then serve the object through the API instead.
    async fn presigned_url(&self, path: &str, ttl: Duration) -> AppResult<Option<String>>;
}
