// ABOUTME: Registry of container lifecycle actions addressable by name.
// ABOUTME: The enum doubles as the validation set and the dispatch table.

use super::error::{FacadeError, Result};
use crate::runtime::ContainerOps;
use crate::types::ContainerId;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A lifecycle command a caller may request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionName {
    Stop,
    Reboot,
    Pause,
    Recover,
    Kill,
    Delete,
}

impl ActionName {
    /// Every registered action, in menu order.
    pub const ALL: [ActionName; 6] = [
        ActionName::Stop,
        ActionName::Reboot,
        ActionName::Pause,
        ActionName::Recover,
        ActionName::Kill,
        ActionName::Delete,
    ];

    /// The registry key callers use to request this action.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::Stop => "STOP",
            ActionName::Reboot => "REBOOT",
            ActionName::Pause => "PAUSE",
            ActionName::Recover => "RECOVER",
            ActionName::Kill => "KILL",
            ActionName::Delete => "DELETE",
        }
    }

    /// The runtime operation this action performs.
    pub fn operation(self) -> &'static str {
        match self {
            ActionName::Stop => "stop",
            ActionName::Reboot => "restart",
            ActionName::Pause => "pause",
            ActionName::Recover => "unpause",
            ActionName::Kill => "kill",
            ActionName::Delete => "remove",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = FacadeError;

    /// Registry keys are matched exactly, case included.
    fn from_str(s: &str) -> Result<Self> {
        ActionName::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| FacadeError::UnknownAction(s.to_string()))
    }
}

/// Run `action` against container `id`.
///
/// Issues exactly one client call. `Delete` always forces removal.
pub async fn dispatch<C>(action: ActionName, id: &ContainerId, client: &C) -> Result<()>
where
    C: ContainerOps + ?Sized,
{
    tracing::info!(%action, container = %id, "dispatching container action");

    let result = match action {
        ActionName::Stop => client.stop_container(id).await,
        ActionName::Reboot => client.restart_container(id).await,
        ActionName::Pause => client.pause_container(id).await,
        ActionName::Recover => client.unpause_container(id).await,
        ActionName::Kill => client.kill_container(id).await,
        ActionName::Delete => client.remove_container(id, true).await,
    };

    result.map_err(|e| {
        tracing::warn!(%action, container = %id, "container action failed: {}", e);
        FacadeError::operation(action.operation(), e)
    })
}

/// Validate `name` against the registry, then dispatch it.
///
/// An unknown name fails with [`FacadeError::UnknownAction`] before the
/// client is touched.
pub async fn dispatch_named<C>(name: &str, id: &ContainerId, client: &C) -> Result<()>
where
    C: ContainerOps + ?Sized,
{
    let action: ActionName = name.parse()?;
    dispatch(action, id, client).await
}
