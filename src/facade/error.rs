// ABOUTME: Error taxonomy for the runtime facade.
// ABOUTME: Separates malformed daemon payloads, unknown actions, and failed daemon calls.

use crate::runtime::{ContainerError, ImageError, SystemError};

/// An error reported by the runtime client for one capability.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    System(#[from] SystemError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl ClientError {
    /// Whether the client failed to decode the daemon's response.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ClientError::System(SystemError::Malformed(_))
                | ClientError::Image(ImageError::Malformed(_))
                | ClientError::Container(ContainerError::Malformed(_))
        )
    }
}

/// Errors surfaced by the facade to its caller.
///
/// Nothing is retried: every daemon call is attempted once and its failure
/// propagates here unchanged.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    /// The daemon returned a payload of unexpected shape.
    #[error("daemon protocol error: {0}")]
    DaemonProtocol(String),

    /// The caller asked for an action outside the registry.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The daemon rejected or failed to execute a known operation.
    #[error("{operation} failed: {source}")]
    RuntimeOperation {
        operation: &'static str,
        source: ClientError,
    },

    /// Local I/O while writing an exported image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FacadeError {
    /// Wrap a client error for `operation`, reclassifying decode failures as
    /// protocol errors.
    pub fn operation(operation: &'static str, err: impl Into<ClientError>) -> Self {
        let source = err.into();
        if source.is_malformed() {
            FacadeError::DaemonProtocol(format!("{}: {}", operation, source))
        } else {
            FacadeError::RuntimeOperation { operation, source }
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        FacadeError::DaemonProtocol(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FacadeError>;
