// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: List, inspect, create, start, and the lifecycle transitions of containers.

use crate::runtime::wire::{RawContainer, RawInspect};
use crate::types::ContainerId;
use async_trait::async_trait;

/// Container lifecycle operations.
///
/// Every method maps to exactly one daemon call.
#[async_trait]
pub trait ContainerOps: Send + Sync {
    /// List containers, including stopped ones when `all` is set.
    async fn list_containers(&self, all: bool) -> Result<Vec<RawContainer>, ContainerError>;

    /// Get detailed information about a container.
    async fn inspect_container(&self, id: &ContainerId) -> Result<RawInspect, ContainerError>;

    /// Create a container and return its id.
    async fn create_container(&self, spec: &CreateSpec) -> Result<ContainerId, ContainerError>;

    /// Start a created or stopped container.
    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Stop a running container using the daemon's default grace period.
    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Restart a container.
    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Freeze all processes in a container.
    async fn pause_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Resume a paused container.
    async fn unpause_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Send SIGKILL to a container.
    async fn kill_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Remove a container, killing it first when `force` is set.
    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;
}

/// Parameters for creating a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSpec {
    /// Image reference to run.
    pub image: String,
    /// Container name; the daemon generates one when unset.
    pub name: Option<String>,
    /// Command override; the image's CMD is used when unset.
    pub command: Option<Vec<String>>,
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already in requested state: {0}")]
    NotModified(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
