// ABOUTME: Bollard-based runtime client implementation.
// ABOUTME: Talks to Docker and Podman through the Docker-compatible Engine API.

use crate::runtime::traits::{
    ContainerError, ContainerOps, CreateSpec, ImageError, ImageOps, ImageStream, SystemError,
    SystemOps,
};
use crate::runtime::types::RuntimeInfo;
use crate::runtime::wire::{RawContainer, RawImage, RawInfo, RawInspect, from_model};
use crate::types::{ContainerId, ImageId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::ContainerCreateBody;
use bollard::query_parameters::{
    CreateContainerOptions, KillContainerOptions, ListContainersOptions, ListImagesOptions,
    RemoveContainerOptions, RemoveImageOptions, RestartContainerOptions, StartContainerOptions,
    StopContainerOptions,
};
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::BodyExt;
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use std::time::Duration;
use tokio::net::UnixStream;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_image_remove_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ImageError::InUse(message.clone()),
        _ => ImageError::Runtime(format!("failed to remove {}: {}", image_name, e)),
    }
}

fn map_image_export_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. }
            if *status_code == 404 =>
        {
            ImageError::NotFound(image_name.to_string())
        }
        _ => ImageError::Runtime(format!("failed to export {}: {}", image_name, e)),
    }
}

fn map_container_create_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::ImageNotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::Conflict(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

/// Map errors from lifecycle calls (start, stop, restart, pause, unpause, kill, remove).
///
/// 304 means the container is already in the requested state; 409 means the
/// transition is not possible from the current state (e.g. pausing a stopped
/// container).
fn map_container_lifecycle_error(e: bollard::errors::Error) -> ContainerError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 304 => ContainerError::NotModified(message.clone()),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::Conflict(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_info_request_error(e: EngineRequestError) -> SystemError {
    match e {
        EngineRequestError::Status { message, .. } => SystemError::Runtime(message),
        EngineRequestError::Transport(message) => SystemError::ConnectionFailed(message),
    }
}

fn map_inspect_request_error(e: EngineRequestError) -> ContainerError {
    match e {
        EngineRequestError::Status {
            status: 404,
            message,
        } => ContainerError::NotFound(message),
        other => ContainerError::Runtime(other.to_string()),
    }
}

// =============================================================================
// Direct Engine API requests
// =============================================================================

/// Failure of a request made outside bollard.
#[derive(Debug, thiserror::Error)]
enum EngineRequestError {
    #[error("daemon returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Transport(String),
}

/// Error body of a failed Engine API call.
#[derive(Deserialize)]
struct EngineErrorBody {
    message: String,
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<EngineErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string())
}

/// GET `path` over the daemon socket and return the response body.
async fn send_get(socket_path: &str, path: &str) -> Result<Bytes, EngineRequestError> {
    let stream = UnixStream::connect(socket_path).await.map_err(|e| {
        EngineRequestError::Transport(format!("failed to connect to {}: {}", socket_path, e))
    })?;

    let io = TokioIo::new(stream);

    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| EngineRequestError::Transport(format!("HTTP handshake failed: {}", e)))?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::warn!("engine connection error: {}", e);
        }
    });

    let req = hyper::Request::builder()
        .method("GET")
        .uri(path)
        .header("Host", "localhost")
        .body(http_body_util::Empty::<Bytes>::new())
        .map_err(|e| EngineRequestError::Transport(format!("failed to build request: {}", e)))?;

    let resp = sender
        .send_request(req)
        .await
        .map_err(|e| EngineRequestError::Transport(format!("request failed: {}", e)))?;

    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| EngineRequestError::Transport(format!("failed to read response: {}", e)))?
        .to_bytes();

    if !status.is_success() {
        return Err(EngineRequestError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }
    Ok(body)
}

fn decode_info(body: &[u8]) -> Result<RawInfo, SystemError> {
    serde_json::from_slice(body).map_err(|e| SystemError::Malformed(format!("info: {}", e)))
}

fn decode_inspect(body: &[u8], id: &ContainerId) -> Result<RawInspect, ContainerError> {
    serde_json::from_slice(body)
        .map_err(|e| ContainerError::Malformed(format!("inspect {}: {}", id, e)))
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Runtime client implementation using bollard.
///
/// Supports both Docker and Podman via the Docker-compatible API. Daemon
/// models are re-decoded into the crate's wire types, so a payload missing a
/// required field surfaces as a `Malformed` error rather than a default value.
///
/// `info` and `inspect_container` read the daemon's JSON directly: bollard's
/// models track the newest API and drop keys older engines still report,
/// such as `BridgeNfIptables` and the top-level container addresses.
pub struct BollardRuntime {
    client: Docker,
    socket_path: String,
    timeout: Duration,
}

impl BollardRuntime {
    /// Connect to a container runtime using detected runtime info.
    ///
    /// The connection is lazy: the socket is first used by the next call.
    /// `timeout` bounds every request made through this client.
    pub fn connect(info: &RuntimeInfo, timeout: Duration) -> Result<Self, SystemError> {
        let client = Docker::connect_with_unix(
            &info.socket_path,
            timeout.as_secs(),
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| SystemError::ConnectionFailed(e.to_string()))?;

        tracing::debug!(
            runtime = %info.runtime_type,
            socket = %info.socket_path,
            "created runtime client"
        );
        Ok(Self {
            client,
            socket_path: info.socket_path.clone(),
            timeout,
        })
    }

    async fn get_json(&self, path: &str) -> Result<Bytes, EngineRequestError> {
        tracing::debug!(path, "engine request");
        tokio::time::timeout(self.timeout, send_get(&self.socket_path, path))
            .await
            .map_err(|_| {
                EngineRequestError::Transport(format!(
                    "GET {} timed out after {}s",
                    path,
                    self.timeout.as_secs()
                ))
            })?
    }
}

#[async_trait]
impl SystemOps for BollardRuntime {
    async fn info(&self) -> Result<RawInfo, SystemError> {
        let body = self.get_json("/info").await.map_err(map_info_request_error)?;
        decode_info(&body)
    }

    async fn ping(&self) -> Result<(), SystemError> {
        self.client
            .ping()
            .await
            .map_err(|e| SystemError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn list_images(&self) -> Result<Vec<RawImage>, ImageError> {
        let opts = ListImagesOptions {
            all: false,
            ..Default::default()
        };

        let images = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(e.to_string()))?;

        images
            .iter()
            .map(|image| {
                from_model(image).map_err(|e| ImageError::Malformed(format!("image: {}", e)))
            })
            .collect()
    }

    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError> {
        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_image(id.as_str(), Some(opts), None)
            .await
            .map_err(|e| map_image_remove_error(e, id.as_str()))?;

        Ok(())
    }

    async fn export_image(&self, id: &ImageId) -> Result<ImageStream, ImageError> {
        let image_name = id.to_string();
        let stream = self
            .client
            .export_image(id.as_str())
            .map(move |chunk| chunk.map_err(|e| map_image_export_error(e, &image_name)));

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn list_containers(&self, all: bool) -> Result<Vec<RawContainer>, ContainerError> {
        let opts = ListContainersOptions {
            all,
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(|e| ContainerError::Runtime(e.to_string()))?;

        containers
            .iter()
            .map(|container| {
                from_model(container)
                    .map_err(|e| ContainerError::Malformed(format!("container: {}", e)))
            })
            .collect()
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<RawInspect, ContainerError> {
        let path = format!("/containers/{}/json", urlencoding::encode(id.as_str()));
        let body = self
            .get_json(&path)
            .await
            .map_err(map_inspect_request_error)?;
        decode_inspect(&body, id)
    }

    async fn create_container(&self, spec: &CreateSpec) -> Result<ContainerId, ContainerError> {
        let body = ContainerCreateBody {
            image: Some(spec.image.clone()),
            cmd: spec.command.clone(),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: spec.name.clone(),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_container_create_error)?;

        for warning in &response.warnings {
            tracing::warn!(image = %spec.image, "create warning: {}", warning);
        }

        Ok(ContainerId::new(response.id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(map_container_lifecycle_error)
    }

    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .stop_container(id.as_str(), None::<StopContainerOptions>)
            .await
            .map_err(map_container_lifecycle_error)
    }

    async fn restart_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .restart_container(id.as_str(), None::<RestartContainerOptions>)
            .await
            .map_err(map_container_lifecycle_error)
    }

    async fn pause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .pause_container(id.as_str())
            .await
            .map_err(map_container_lifecycle_error)
    }

    async fn unpause_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .unpause_container(id.as_str())
            .await
            .map_err(map_container_lifecycle_error)
    }

    async fn kill_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .kill_container(id.as_str(), None::<KillContainerOptions>)
            .await
            .map_err(map_container_lifecycle_error)
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_lifecycle_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::{normalize_containers, normalize_detail, normalize_images, summarize};
    use bollard::models::{
        ContainerConfig, ContainerInspectResponse, ContainerSummary, EndpointSettings,
        ImageSummary, NetworkSettings,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn server_error(status_code: u16) -> bollard::errors::Error {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message: format!("status {}", status_code),
        }
    }

    #[test]
    fn lifecycle_errors_map_status_codes() {
        assert!(matches!(
            map_container_lifecycle_error(server_error(404)),
            ContainerError::NotFound(_)
        ));
        assert!(matches!(
            map_container_lifecycle_error(server_error(304)),
            ContainerError::NotModified(_)
        ));
        assert!(matches!(
            map_container_lifecycle_error(server_error(409)),
            ContainerError::Conflict(_)
        ));
        assert!(matches!(
            map_container_lifecycle_error(server_error(500)),
            ContainerError::Runtime(_)
        ));
    }

    #[test]
    fn image_remove_errors_map_status_codes() {
        assert!(matches!(
            map_image_remove_error(server_error(404), "nginx:latest"),
            ImageError::NotFound(name) if name == "nginx:latest"
        ));
        assert!(matches!(
            map_image_remove_error(server_error(409), "nginx:latest"),
            ImageError::InUse(_)
        ));
    }

    #[test]
    fn create_errors_distinguish_missing_image() {
        assert!(matches!(
            map_container_create_error(server_error(404)),
            ContainerError::ImageNotFound(_)
        ));
        assert!(matches!(
            map_container_create_error(server_error(409)),
            ContainerError::Conflict(_)
        ));
    }

    #[test]
    fn status_errors_carry_engine_message() {
        let err = map_inspect_request_error(EngineRequestError::Status {
            status: 404,
            message: error_message(br#"{"message":"No such container: web1"}"#),
        });
        assert!(matches!(err, ContainerError::NotFound(msg) if msg == "No such container: web1"));

        let err = map_info_request_error(EngineRequestError::Status {
            status: 500,
            message: error_message(b"internal failure\n"),
        });
        assert!(matches!(err, SystemError::Runtime(msg) if msg == "internal failure"));

        let err = map_info_request_error(EngineRequestError::Transport("refused".to_string()));
        assert!(matches!(err, SystemError::ConnectionFailed(_)));
    }

    #[test]
    fn info_body_keeps_bridge_flag() {
        let body = serde_json::to_vec(&json!({
            "Name": "host1",
            "KernelVersion": "6.1.0",
            "OperatingSystem": "Debian GNU/Linux 12",
            "MemTotal": 8_589_934_592u64,
            "NCPU": 4,
            "Containers": 3,
            "Images": 7,
            "Driver": "overlay2",
            "DockerRootDir": "/var/lib/docker",
            "OomKillDisable": false,
            "IPv4Forwarding": true,
            "BridgeNfIptables": true,
            "DriverStatus": [["Backing Filesystem", "extfs"]]
        }))
        .unwrap();

        let summary = summarize(&decode_info(&body).unwrap());

        assert_eq!(summary.engine.bridge_nf_iptables, Some(true));
        assert_eq!(summary.engine.ipv4_forwarding, Some(true));
        assert_eq!(summary.host.cpu_count, 4);
    }

    #[test]
    fn info_body_missing_key_is_malformed() {
        let body = br#"{"Name":"host1"}"#;
        assert!(matches!(decode_info(body), Err(SystemError::Malformed(_))));
    }

    #[test]
    fn inspect_body_keeps_top_level_addresses() {
        let body = serde_json::to_vec(&json!({
            "Id": "0123456789abcdef",
            "Config": { "Hostname": "web" },
            "NetworkSettings": {
                "IPAddress": "172.17.0.2",
                "MacAddress": "02:42:ac:11:00:02",
                "Gateway": "172.17.0.1",
                "Networks": { "bridge": { "IPAddress": "172.17.0.2" } }
            }
        }))
        .unwrap();

        let id = ContainerId::new("web1");
        let detail = normalize_detail(&decode_inspect(&body, &id).unwrap());

        assert_eq!(detail.ip_address.as_deref(), Some("172.17.0.2"));
        assert_eq!(detail.mac_address.as_deref(), Some("02:42:ac:11:00:02"));
        assert_eq!(detail.gateway.as_deref(), Some("172.17.0.1"));
    }

    #[test]
    fn inspect_model_addresses_come_from_networks() {
        let endpoint = EndpointSettings {
            ip_address: Some("172.17.0.2".to_string()),
            mac_address: Some("02:42:ac:11:00:02".to_string()),
            gateway: Some("172.17.0.1".to_string()),
            ..Default::default()
        };
        let model = ContainerInspectResponse {
            id: Some("0123456789abcdef".to_string()),
            config: Some(ContainerConfig {
                hostname: Some("web".to_string()),
                cmd: Some(vec!["nginx".to_string(), "-g".to_string()]),
                ..Default::default()
            }),
            network_settings: Some(NetworkSettings {
                networks: Some(HashMap::from([("bridge".to_string(), endpoint)])),
                ..Default::default()
            }),
            ..Default::default()
        };

        let raw: RawInspect = from_model(&model).unwrap();
        let detail = normalize_detail(&raw);

        assert_eq!(detail.hostname.as_deref(), Some("web"));
        assert_eq!(detail.ip_address.as_deref(), Some("172.17.0.2"));
        assert_eq!(detail.mac_address.as_deref(), Some("02:42:ac:11:00:02"));
        assert_eq!(detail.gateway.as_deref(), Some("172.17.0.1"));
        assert_eq!(detail.command.as_deref(), Some("nginx -g"));
        assert_eq!(detail.mounts, None);
    }

    #[test]
    fn image_model_decodes_and_normalizes() {
        let model = ImageSummary {
            id: "sha256:abcdef0123456789".to_string(),
            repo_tags: vec!["nginx:latest".to_string(), "nginx:1.27".to_string()],
            created: 1_700_000_000,
            size: 3 * 1024 * 1024,
            ..Default::default()
        };

        let raw: RawImage = from_model(&model).unwrap();
        assert_eq!(raw.id.as_str(), "sha256:abcdef0123456789");
        assert_eq!(raw.size, 3 * 1024 * 1024);

        let records = normalize_images(&[raw]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].short_id, "sha256:abcde");
        assert_eq!(records[1].tag, "1.27");
        assert_eq!(records[0].virtual_size, "3M");
    }

    #[test]
    fn container_model_decodes_and_normalizes() {
        let model = ContainerSummary {
            id: Some("0123456789abcdef".to_string()),
            names: Some(vec!["/web1".to_string()]),
            image: Some("nginx:latest".to_string()),
            created: Some(1_700_000_000),
            status: Some("Up 2 minutes".to_string()),
            ..Default::default()
        };

        let raw: RawContainer = from_model(&model).unwrap();
        let records = normalize_containers(&[raw]).unwrap();

        assert_eq!(records[0].name, "web1");
        assert_eq!(records[0].short_id, "0123456789ab");
        assert_eq!(records[0].status, "Up 2 minutes");
    }

    #[test]
    fn container_model_without_status_is_rejected() {
        let model = ContainerSummary {
            id: Some("0123456789abcdef".to_string()),
            image: Some("nginx:latest".to_string()),
            created: Some(0),
            ..Default::default()
        };

        let result: Result<RawContainer, _> = from_model(&model);
        assert!(result.is_err());
    }
}
