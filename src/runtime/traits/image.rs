// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: List, remove, and export container images.

use crate::runtime::wire::RawImage;
use crate::types::ImageId;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// Chunks of an image tarball as produced by the daemon.
pub type ImageStream = Pin<Box<dyn Stream<Item = Result<Bytes, ImageError>> + Send>>;

/// Image operations: list, remove, export.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// List top-level images.
    async fn list_images(&self) -> Result<Vec<RawImage>, ImageError>;

    /// Remove an image by id or `repository:tag`.
    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError>;

    /// Export an image as a tarball stream.
    async fn export_image(&self, id: &ImageId) -> Result<ImageStream, ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
