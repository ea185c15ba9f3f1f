// ABOUTME: Daemon-wide operations trait for container runtimes.
// ABOUTME: Query host and engine information and check connectivity.

use crate::runtime::wire::RawInfo;
use async_trait::async_trait;

/// Daemon-wide operations.
#[async_trait]
pub trait SystemOps: Send + Sync {
    /// Get host, engine and storage information.
    async fn info(&self) -> Result<RawInfo, SystemError>;

    /// Ping the runtime to check connectivity.
    async fn ping(&self) -> Result<(), SystemError>;
}

/// Errors from daemon-wide operations.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
