// ABOUTME: Converts raw image, container, and inspect payloads into display records.
// ABOUTME: Pure functions; a failed pass never returns a partial list.

use super::error::{FacadeError, Result};
use super::format::{format_bytes, format_timestamp};
use crate::runtime::wire::{RawContainer, RawImage, RawInspect, RawNetworkSettings};
use serde::Serialize;

/// Rendered in place of an absent collection or argv.
pub const NONE_SENTINEL: &str = "None";

/// One row per `repository:tag` of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub repository: String,
    pub tag: String,
    pub short_id: String,
    pub created: String,
    pub virtual_size: String,
}

impl ImageRecord {
    pub const HEADERS: [&'static str; 5] = ["REPOSITORY", "TAG", "IMAGE ID", "CREATED", "SIZE"];

    pub fn row(&self) -> Vec<String> {
        vec![
            self.repository.clone(),
            self.tag.clone(),
            self.short_id.clone(),
            self.created.clone(),
            self.virtual_size.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerRecord {
    pub name: String,
    pub image: String,
    pub short_id: String,
    pub created: String,
    /// Daemon-provided status text, e.g. `Up 3 hours`.
    pub status: String,
}

impl ContainerRecord {
    pub const HEADERS: [&'static str; 5] = ["NAME", "IMAGE", "CONTAINER ID", "CREATED", "STATUS"];

    pub fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.image.clone(),
            self.short_id.clone(),
            self.created.clone(),
            self.status.clone(),
        ]
    }
}

/// Network, mount, and command details of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerDetail {
    pub hostname: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub gateway: Option<String>,
    /// `hostIp:hostPort->containerPort` per published port.
    pub port_mappings: Option<Vec<String>>,
    /// `source:destination` per mount.
    pub mounts: Option<Vec<String>>,
    pub command: Option<String>,
    pub entrypoint: Option<String>,
}

impl ContainerDetail {
    /// Labelled display values.
    ///
    /// Network fields are listed only when known. Ports, mounts, command and
    /// entrypoint are always listed, as [`NONE_SENTINEL`] when absent.
    pub fn display_fields(&self) -> Vec<(&'static str, String)> {
        let network = [
            ("Hostname", &self.hostname),
            ("IP address", &self.ip_address),
            ("MAC address", &self.mac_address),
            ("Gateway", &self.gateway),
        ];

        let mut fields: Vec<(&'static str, String)> = network
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| (label, v.clone())))
            .collect();

        fields.push(("Ports", render_list(self.port_mappings.as_deref())));
        fields.push(("Mounts", render_list(self.mounts.as_deref())));
        fields.push(("Command", render_text(self.command.as_deref())));
        fields.push(("Entrypoint", render_text(self.entrypoint.as_deref())));
        fields
    }
}

fn render_list(items: Option<&[String]>) -> String {
    items
        .map(|items| items.join(", "))
        .unwrap_or_else(|| NONE_SENTINEL.to_string())
}

fn render_text(text: Option<&str>) -> String {
    text.unwrap_or(NONE_SENTINEL).to_string()
}

/// Expand images into one record per tag, preserving image then tag order.
pub fn normalize_images(images: &[RawImage]) -> Result<Vec<ImageRecord>> {
    let mut records = Vec::new();

    for image in images {
        let tags = image.repo_tags.as_deref().unwrap_or_default();
        if tags.is_empty() {
            continue;
        }

        let created = format_timestamp(image.created)?;
        let size = image.virtual_size.unwrap_or(image.size);
        let size = u64::try_from(size).map_err(|_| {
            FacadeError::protocol(format!("negative size {} for image {}", size, image.id))
        })?;
        let virtual_size = format_bytes(size);

        for repo_tag in tags {
            let (repository, tag) = split_repo_tag(repo_tag)?;
            records.push(ImageRecord {
                repository: repository.to_string(),
                tag: tag.to_string(),
                short_id: image.id.short().to_string(),
                created: created.clone(),
                virtual_size: virtual_size.clone(),
            });
        }
    }

    Ok(records)
}

/// Split `repository:tag` at the tag colon, leaving registry ports intact.
fn split_repo_tag(repo_tag: &str) -> Result<(&str, &str)> {
    match repo_tag.rsplit_once(':') {
        Some((repository, tag)) if !tag.contains('/') => Ok((repository, tag)),
        _ => Err(FacadeError::protocol(format!(
            "image tag without repository:tag form: {}",
            repo_tag
        ))),
    }
}

/// One record per container, in daemon order.
pub fn normalize_containers(containers: &[RawContainer]) -> Result<Vec<ContainerRecord>> {
    containers
        .iter()
        .map(|container| {
            Ok(ContainerRecord {
                name: display_name(container.names.as_deref().unwrap_or_default()),
                image: container.image.clone(),
                short_id: container.id.short().to_string(),
                created: format_timestamp(container.created)?,
                status: container.status.clone(),
            })
        })
        .collect()
}

/// Join all names and drop the first character (the daemon's leading `/`).
fn display_name(names: &[String]) -> String {
    names.concat().chars().skip(1).collect()
}

/// Flatten an inspect payload into the fixed-schema detail record.
pub fn normalize_detail(inspect: &RawInspect) -> ContainerDetail {
    let config = &inspect.config;
    let network = &inspect.network_settings;
    let endpoint = network.primary_endpoint();

    ContainerDetail {
        hostname: config.hostname.clone(),
        ip_address: network_value(
            network.ip_address.as_ref(),
            endpoint.and_then(|e| e.ip_address.as_ref()),
        ),
        mac_address: network_value(
            network.mac_address.as_ref(),
            endpoint.and_then(|e| e.mac_address.as_ref()),
        ),
        gateway: network_value(
            network.gateway.as_ref(),
            endpoint.and_then(|e| e.gateway.as_ref()),
        )
        .filter(|g| !g.is_empty()),
        port_mappings: port_mappings(network),
        mounts: inspect.mounts.as_ref().map(|mounts| {
            mounts
                .iter()
                .map(|m| format!("{}:{}", m.source, m.destination))
                .collect()
        }),
        command: config.cmd.as_ref().map(|argv| argv.join(" ")),
        entrypoint: config.entrypoint.as_ref().map(|argv| argv.join(" ")),
    }
}

/// A non-empty top-level value wins; otherwise the primary endpoint's value is used.
fn network_value(top_level: Option<&String>, endpoint: Option<&String>) -> Option<String> {
    match (top_level, endpoint) {
        (Some(value), _) if !value.is_empty() => Some(value.clone()),
        (_, Some(value)) => Some(value.clone()),
        (top_level, None) => top_level.cloned(),
    }
}

/// Render the first host binding of every published port.
fn port_mappings(network: &RawNetworkSettings) -> Option<Vec<String>> {
    let ports = network.ports.as_ref()?;
    Some(
        ports
            .iter()
            .filter_map(|(port, bindings)| {
                let binding = bindings.as_ref()?.first()?;
                Some(format!("{}:{}->{}", binding.host_ip, binding.host_port, port))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_registry_port() {
        assert_eq!(
            split_repo_tag("localhost:5000/app:1.0").unwrap(),
            ("localhost:5000/app", "1.0")
        );
    }

    #[test]
    fn split_rejects_untagged_reference() {
        assert!(split_repo_tag("nginx").is_err());
        assert!(split_repo_tag("localhost:5000/app").is_err());
    }

    #[test]
    fn split_accepts_dangling_placeholder() {
        assert_eq!(split_repo_tag("<none>:<none>").unwrap(), ("<none>", "<none>"));
    }

    #[test]
    fn display_name_strips_exactly_one_character() {
        assert_eq!(display_name(&["/web1".to_string()]), "web1");
        assert_eq!(display_name(&["web1".to_string()]), "eb1");
        assert_eq!(display_name(&[]), "");
    }

    #[test]
    fn network_value_prefers_non_empty_top_level() {
        let top = "172.17.0.2".to_string();
        let empty = String::new();
        let endpoint = "10.0.0.5".to_string();

        assert_eq!(network_value(Some(&top), Some(&endpoint)), Some(top.clone()));
        assert_eq!(network_value(Some(&empty), Some(&endpoint)), Some(endpoint.clone()));
        assert_eq!(network_value(None, Some(&endpoint)), Some(endpoint));
        assert_eq!(network_value(Some(&empty), None), Some(empty));
        assert_eq!(network_value(None, None), None);
    }

    #[test]
    fn display_fields_skip_unknown_network_values() {
        let detail = ContainerDetail {
            hostname: Some("web".to_string()),
            ..Default::default()
        };
        let labels: Vec<&str> = detail.display_fields().iter().map(|(l, _)| *l).collect();
        assert_eq!(
            labels,
            vec!["Hostname", "Ports", "Mounts", "Command", "Entrypoint"]
        );
    }
}
