// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Detection, the bollard-backed client, capability traits, and wire payloads.

mod client;
mod detection;
mod error;
pub mod traits;
mod types;
pub mod wire;

pub use client::BollardRuntime;
pub use detection::{DetectionError, detect_local, resolve_runtime};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::*;
pub use types::{RuntimeConfig, RuntimeInfo, RuntimeType};
