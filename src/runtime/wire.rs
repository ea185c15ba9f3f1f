// ABOUTME: Typed daemon payloads decoded at the runtime boundary.
// ABOUTME: Only the fields the facade reads are modelled; everything else is dropped.

use crate::types::{ContainerId, ImageId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daemon-wide information as reported by `GET /info`.
///
/// Required keys are the ones every Docker-compatible daemon reports. The
/// kernel feature flags are optional because recent engines drop some of
/// them, and `DriverStatus` is null for snapshotter-backed storage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawInfo {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "KernelVersion")]
    pub kernel_version: String,
    #[serde(rename = "OperatingSystem")]
    pub operating_system: String,
    #[serde(rename = "MemTotal")]
    pub mem_total: u64,
    #[serde(rename = "NCPU")]
    pub ncpu: u64,

    #[serde(rename = "Containers")]
    pub containers: u64,
    #[serde(rename = "Images")]
    pub images: u64,
    #[serde(rename = "Driver")]
    pub driver: String,
    #[serde(rename = "OomKillDisable", default)]
    pub oom_kill_disable: Option<bool>,
    #[serde(rename = "IPv4Forwarding", default)]
    pub ipv4_forwarding: Option<bool>,
    #[serde(rename = "BridgeNfIptables", default)]
    pub bridge_nf_iptables: Option<bool>,
    #[serde(rename = "DockerRootDir")]
    pub docker_root_dir: String,

    /// Storage driver metrics as `[label, value]` pairs.
    #[serde(rename = "DriverStatus", default)]
    pub driver_status: Option<Vec<(String, String)>>,
}

/// One entry of `GET /images/json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawImage {
    #[serde(rename = "Id")]
    pub id: ImageId,
    #[serde(rename = "RepoTags", default)]
    pub repo_tags: Option<Vec<String>>,
    /// Creation time in seconds since the epoch.
    #[serde(rename = "Created")]
    pub created: i64,
    #[serde(rename = "Size")]
    pub size: i64,
    /// Removed from the API in v1.44; `size` carries the same value there.
    #[serde(rename = "VirtualSize", default)]
    pub virtual_size: Option<i64>,
}

/// One entry of `GET /containers/json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawContainer {
    #[serde(rename = "Id")]
    pub id: ContainerId,
    #[serde(rename = "Names", default)]
    pub names: Option<Vec<String>>,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Created")]
    pub created: i64,
    #[serde(rename = "Status")]
    pub status: String,
}

/// The subset of `GET /containers/{id}/json` used for the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawInspect {
    #[serde(rename = "Id")]
    pub id: ContainerId,
    #[serde(rename = "Config")]
    pub config: RawContainerConfig,
    #[serde(rename = "NetworkSettings")]
    pub network_settings: RawNetworkSettings,
    #[serde(rename = "Mounts", default)]
    pub mounts: Option<Vec<RawMount>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawContainerConfig {
    #[serde(rename = "Hostname", default)]
    pub hostname: Option<String>,
    #[serde(rename = "Cmd", default)]
    pub cmd: Option<Vec<String>>,
    #[serde(rename = "Entrypoint", default)]
    pub entrypoint: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawNetworkSettings {
    /// Exposed port key (`"80/tcp"`) to its host bindings, null when unpublished.
    #[serde(rename = "Ports", default)]
    pub ports: Option<BTreeMap<String, Option<Vec<RawPortBinding>>>>,
    #[serde(rename = "IPAddress", default)]
    pub ip_address: Option<String>,
    #[serde(rename = "MacAddress", default)]
    pub mac_address: Option<String>,
    #[serde(rename = "Gateway", default)]
    pub gateway: Option<String>,
    /// Per-network endpoints. Newer engines report addresses only here.
    #[serde(rename = "Networks", default)]
    pub networks: Option<BTreeMap<String, RawEndpoint>>,
}

impl RawNetworkSettings {
    /// The endpoint on the `bridge` network, else the first network by name.
    pub fn primary_endpoint(&self) -> Option<&RawEndpoint> {
        let networks = self.networks.as_ref()?;
        networks
            .get(DEFAULT_NETWORK)
            .or_else(|| networks.values().next())
    }
}

/// Name of the engine's default network.
pub const DEFAULT_NETWORK: &str = "bridge";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawEndpoint {
    #[serde(rename = "IPAddress", default)]
    pub ip_address: Option<String>,
    #[serde(rename = "MacAddress", default)]
    pub mac_address: Option<String>,
    #[serde(rename = "Gateway", default)]
    pub gateway: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPortBinding {
    #[serde(rename = "HostIp", default)]
    pub host_ip: String,
    #[serde(rename = "HostPort", default)]
    pub host_port: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawMount {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Destination")]
    pub destination: String,
}

/// Re-decode a client model through its Docker wire representation.
///
/// Client libraries serialize their models with the daemon's own field names,
/// so this selects exactly the fields declared on `T`.
pub fn from_model<M, T>(model: &M) -> Result<T, serde_json::Error>
where
    M: Serialize,
    T: DeserializeOwned,
{
    serde_json::to_value(model).and_then(serde_json::from_value)
}
