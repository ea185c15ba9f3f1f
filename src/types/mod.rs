// ABOUTME: Type-safe identifiers shared by the facade and runtime client.
// ABOUTME: Uses phantom types so container and image ids cannot be swapped.

mod id;

pub use id::{ContainerId, ImageId, SHORT_ID_LEN};
