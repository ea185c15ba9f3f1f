// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines SystemOps, ImageOps, ContainerOps and the combined RuntimeClient.

mod container;
mod image;
mod system;

pub use container::{ContainerError, ContainerOps, CreateSpec};
pub use image::{ImageError, ImageOps, ImageStream};
pub use system::{SystemError, SystemOps};

/// Everything the facade needs from a daemon connection.
///
/// Implemented automatically for any type providing all three capabilities.
pub trait RuntimeClient: SystemOps + ImageOps + ContainerOps {}

impl<T: SystemOps + ImageOps + ContainerOps + ?Sized> RuntimeClient for T {}
