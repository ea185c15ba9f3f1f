// ABOUTME: Runtime facade: normalized views and named actions over a runtime client.
// ABOUTME: The client is injected per request; the facade keeps no state of its own.

mod actions;
mod error;
mod format;
mod normalize;
mod summary;

pub use actions::{ActionName, dispatch, dispatch_named};
pub use error::{ClientError, FacadeError, Result};
pub use format::{TIMESTAMP_FORMAT, format_bytes, format_timestamp};
pub use normalize::{
    ContainerDetail, ContainerRecord, ImageRecord, NONE_SENTINEL, normalize_containers,
    normalize_detail, normalize_images,
};
pub use summary::{
    EngineInfo, HostInfo, InfoSummary, STORAGE_LABEL_MARKER, StorageUsage, summarize,
};

use crate::runtime::{ContainerOps, CreateSpec, ImageOps, ImageStream, RuntimeClient, SystemOps};
use crate::types::{ContainerId, ImageId};
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Request to create and start a container from an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    pub image: String,
    pub name: Option<String>,
    /// Whitespace-separated command; the image default is used when empty.
    pub command: Option<String>,
}

impl LaunchRequest {
    fn to_spec(&self) -> CreateSpec {
        let command: Option<Vec<String>> = self
            .command
            .as_deref()
            .map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|argv| !argv.is_empty());

        CreateSpec {
            image: self.image.clone(),
            name: self.name.clone().filter(|n| !n.is_empty()),
            command,
        }
    }
}

/// Views and commands bound to one runtime client for one request.
pub struct RuntimeFacade<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C: RuntimeClient + ?Sized> RuntimeFacade<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Host, engine, and storage information.
    pub async fn summary(&self) -> Result<InfoSummary> {
        tracing::debug!("querying daemon info");
        let raw = self
            .client
            .info()
            .await
            .map_err(|e| FacadeError::operation("info", e))?;
        Ok(summarize(&raw))
    }

    /// One record per image tag.
    pub async fn images(&self) -> Result<Vec<ImageRecord>> {
        tracing::debug!("listing images");
        let raw = self
            .client
            .list_images()
            .await
            .map_err(|e| FacadeError::operation("list images", e))?;
        normalize_images(&raw)
    }

    /// All containers, stopped ones included.
    pub async fn containers(&self) -> Result<Vec<ContainerRecord>> {
        tracing::debug!("listing containers");
        let raw = self
            .client
            .list_containers(true)
            .await
            .map_err(|e| FacadeError::operation("list containers", e))?;
        normalize_containers(&raw)
    }

    pub async fn container_detail(&self, id: &ContainerId) -> Result<ContainerDetail> {
        tracing::debug!(container = %id, "inspecting container");
        let raw = self
            .client
            .inspect_container(id)
            .await
            .map_err(|e| FacadeError::operation("inspect", e))?;
        Ok(normalize_detail(&raw))
    }

    /// The action menu offered to callers.
    pub fn actions(&self) -> &'static [ActionName] {
        &ActionName::ALL
    }

    pub async fn dispatch(&self, action: ActionName, id: &ContainerId) -> Result<()> {
        dispatch(action, id, self.client).await
    }

    pub async fn dispatch_named(&self, name: &str, id: &ContainerId) -> Result<()> {
        dispatch_named(name, id, self.client).await
    }

    pub async fn remove_image(&self, id: &ImageId) -> Result<()> {
        tracing::info!(image = %id, "removing image");
        self.client
            .remove_image(id, false)
            .await
            .map_err(|e| FacadeError::operation("remove image", e))
    }

    /// Create a container and start it, returning the new container's id.
    ///
    /// If the start fails the created container is left in place.
    pub async fn launch(&self, request: &LaunchRequest) -> Result<ContainerId> {
        let spec = request.to_spec();
        tracing::info!(image = %spec.image, name = ?spec.name, "launching container");

        let id = self
            .client
            .create_container(&spec)
            .await
            .map_err(|e| FacadeError::operation("create", e))?;
        self.client
            .start_container(&id)
            .await
            .map_err(|e| FacadeError::operation("start", e))?;
        Ok(id)
    }

    /// Write the image tarball to `path`, returning the number of bytes written.
    ///
    /// A file this call created is removed again if the export fails part
    /// way. A pre-existing file that could not be opened is left alone.
    pub async fn save_image(&self, id: &ImageId, path: &Path) -> Result<u64> {
        tracing::info!(image = %id, path = %path.display(), "saving image");

        let stream = self
            .client
            .export_image(id)
            .await
            .map_err(|e| FacadeError::operation("export image", e))?;

        let mut file = tokio::fs::File::create(path).await?;
        let written = write_stream(stream, &mut file).await;
        drop(file);

        if written.is_err()
            && let Err(e) = tokio::fs::remove_file(path).await
        {
            tracing::warn!(path = %path.display(), "failed to remove partial export: {}", e);
        }
        written
    }
}

async fn write_stream(mut stream: ImageStream, file: &mut tokio::fs::File) -> Result<u64> {
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FacadeError::operation("export image", e))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_splits_command_on_whitespace() {
        let request = LaunchRequest {
            image: "busybox:latest".to_string(),
            name: Some("box".to_string()),
            command: Some("  sh -c   true ".to_string()),
        };
        let spec = request.to_spec();
        assert_eq!(
            spec.command,
            Some(vec!["sh".to_string(), "-c".to_string(), "true".to_string()])
        );
        assert_eq!(spec.name.as_deref(), Some("box"));
    }

    #[test]
    fn blank_command_and_name_fall_back_to_defaults() {
        let request = LaunchRequest {
            image: "busybox:latest".to_string(),
            name: Some(String::new()),
            command: Some("   ".to_string()),
        };
        let spec = request.to_spec();
        assert!(spec.command.is_none());
        assert!(spec.name.is_none());
    }
}
