// ABOUTME: Partitions daemon-wide info into host, engine, and storage buckets.
// ABOUTME: Bucket membership is explicit field selection on the decoded payload.

use super::format::format_bytes;
use crate::runtime::wire::RawInfo;
use serde::Serialize;
use std::collections::BTreeMap;

/// Storage driver metrics are kept only when their label contains this marker.
pub const STORAGE_LABEL_MARKER: &str = "Data Space";

/// Host machine facts reported by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostInfo {
    pub name: String,
    pub kernel_version: String,
    pub operating_system: String,
    /// Total memory in bytes.
    pub mem_total: u64,
    pub cpu_count: u64,
}

/// Engine-level counters and settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub container_count: u64,
    pub image_count: u64,
    pub storage_driver: String,
    pub oom_kill_disabled: Option<bool>,
    pub ipv4_forwarding: Option<bool>,
    pub bridge_nf_iptables: Option<bool>,
    pub root_dir: String,
}

/// Data-space metrics keyed by their exact driver label.
pub type StorageUsage = BTreeMap<String, String>;

/// The three views of daemon-wide info.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoSummary {
    pub host: HostInfo,
    pub engine: EngineInfo,
    pub storage: StorageUsage,
}

/// Split a decoded info payload into its host, engine, and storage buckets.
pub fn summarize(raw: &RawInfo) -> InfoSummary {
    let host = HostInfo {
        name: raw.name.clone(),
        kernel_version: raw.kernel_version.clone(),
        operating_system: raw.operating_system.clone(),
        mem_total: raw.mem_total,
        cpu_count: raw.ncpu,
    };

    let engine = EngineInfo {
        container_count: raw.containers,
        image_count: raw.images,
        storage_driver: raw.driver.clone(),
        oom_kill_disabled: raw.oom_kill_disable,
        ipv4_forwarding: raw.ipv4_forwarding,
        bridge_nf_iptables: raw.bridge_nf_iptables,
        root_dir: raw.docker_root_dir.clone(),
    };

    let storage = raw
        .driver_status
        .iter()
        .flatten()
        .filter(|(label, _)| label.contains(STORAGE_LABEL_MARKER))
        .map(|(label, value)| (label.clone(), value.clone()))
        .collect();

    InfoSummary {
        host,
        engine,
        storage,
    }
}

impl HostInfo {
    /// Labelled display values, memory rendered with [`format_bytes`].
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Kernel", self.kernel_version.clone()),
            ("OS", self.operating_system.clone()),
            ("Memory", format_bytes(self.mem_total)),
            ("CPUs", self.cpu_count.to_string()),
        ]
    }
}

impl EngineInfo {
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Containers", self.container_count.to_string()),
            ("Images", self.image_count.to_string()),
            ("Storage driver", self.storage_driver.clone()),
            ("OOM kill disabled", flag(self.oom_kill_disabled)),
            ("IPv4 forwarding", flag(self.ipv4_forwarding)),
            ("Bridge nf-iptables", flag(self.bridge_nf_iptables)),
            ("Root dir", self.root_dir.clone()),
        ]
    }
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "true".to_string(),
        Some(false) => "false".to_string(),
        None => "unknown".to_string(),
    }
}
