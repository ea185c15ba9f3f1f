// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording in-memory runtime client for facade tests.

use async_trait::async_trait;
use berth::runtime::wire::{RawContainer, RawImage, RawInfo, RawInspect};
use berth::runtime::{
    ContainerError, ContainerOps, CreateSpec, ImageError, ImageOps, ImageStream, SystemError,
    SystemOps,
};
use berth::types::{ContainerId, ImageId};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("berth=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A client call as observed by [`MockRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum Call {
    Info,
    Ping,
    ListImages,
    RemoveImage { id: String, force: bool },
    ExportImage(String),
    ListContainers { all: bool },
    Inspect(String),
    Create(CreateSpec),
    Start(String),
    Stop(String),
    Restart(String),
    Pause(String),
    Unpause(String),
    Kill(String),
    Remove { id: String, force: bool },
}

/// In-memory runtime client that records every call.
///
/// Payloads are given as daemon JSON and decoded on each call, like the real
/// client does. Lifecycle calls fail with `NotFound` for ids in `missing`.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockRuntime {
    pub info: Option<Value>,
    pub images: Vec<Value>,
    pub containers: Vec<Value>,
    pub inspect: Option<Value>,
    pub export_chunks: Vec<Result<Vec<u8>, String>>,
    pub missing: Vec<String>,
    pub calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn lifecycle(&self, call: Call, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(call);
        if self.missing.iter().any(|m| m == id.as_str()) {
            return Err(ContainerError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: &Value) -> Result<T, String> {
    serde_json::from_value(value.clone()).map_err(|e| e.to_string())
}

#[async_trait]
impl SystemOps for MockRuntime {
    async fn info(&self) -> Result<RawInfo, SystemError> {
        self.record(Call::Info);
        let value = self
            .info
            .as_ref()
            .ok_or_else(|| SystemError::ConnectionFailed("daemon unreachable".to_string()))?;
        decode(value).map_err(SystemError::Malformed)
    }

    async fn ping(&self) -> Result<(), SystemError> {
        self.record(Call::Ping);
        Ok(())
    }
}

#[async_trait]
impl ImageOps for MockRuntime {
    async fn list_images(&self) -> Result<Vec<RawImage>, ImageError> {
        self.record(Call::ListImages);
        self.images
            .iter()
            .map(|v| decode(v).map_err(ImageError::Malformed))
            .collect()
    }

    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError> {
        self.record(Call::RemoveImage {
            id: id.to_string(),
            force,
        });
        if self.missing.iter().any(|m| m == id.as_str()) {
            return Err(ImageError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn export_image(&self, id: &ImageId) -> Result<ImageStream, ImageError> {
        self.record(Call::ExportImage(id.to_string()));
        let chunks: Vec<Result<Bytes, ImageError>> = self
            .export_chunks
            .iter()
            .map(|chunk| match chunk {
                Ok(data) => Ok(Bytes::from(data.clone())),
                Err(msg) => Err(ImageError::Runtime(msg.clone())),
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

#[async_trait]
impl ContainerOps for MockRuntime {
    async fn list_containers(&self, all: bool) -> Result<Vec<RawContainer>, ContainerError> {
        self.record(Call::ListContainers { all });
        self.containers
            .iter()
            .map(|v| decode(v).map_err(ContainerError::Malformed))
            .collect()
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<RawInspect, ContainerError> {
        self.record(Call::Inspect(id.to_string()));
        let value = self
            .inspect
            .as_ref()
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        decode(value).map_err(ContainerError::Malformed)
    }

    async fn create_container(&self, spec: &CreateSpec) -> Result<ContainerId, ContainerError> {
        self.record(Call::Create(spec.clone()));
        Ok(ContainerId::new("f00dfeedcafe0123456789"))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.lifecycle(Call::Start(id.to_string()), id)
    }

    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.lifecycle(Call::Stop(id.to_string()), id)
    }

    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.lifecycle(Call::Restart(id.to_string()), id)
    }

    async fn pause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.lifecycle(Call::Pause(id.to_string()), id)
    }

    async fn unpause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.lifecycle(Call::Unpause(id.to_string()), id)
    }

    async fn kill_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.lifecycle(Call::Kill(id.to_string()), id)
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        self.lifecycle(
            Call::Remove {
                id: id.to_string(),
                force,
            },
            id,
        )
    }
}
