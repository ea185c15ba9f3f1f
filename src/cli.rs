// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use berth::facade::ActionName;
use berth::types::{ContainerId, ImageId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "berth")]
#[command(about = "Inspect and manage containers on a Docker or Podman daemon")]
#[command(version)]
pub struct Cli {
    /// Path to a berth.yml configuration file
    #[arg(long, global = true, env = "BERTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print values only, without headers
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show host, engine, and storage information
    Info,

    /// List images, one row per tag
    Images,

    /// Remove an image
    Rmi {
        /// Image id or repository:tag
        image: ImageId,
    },

    /// Save an image to a tar archive
    Save {
        /// Image id or repository:tag
        image: ImageId,

        /// Destination file
        path: PathBuf,
    },

    /// Create and start a container
    Run {
        /// Image to run
        image: String,

        /// Container name
        #[arg(long)]
        name: Option<String>,

        /// Command to run instead of the image default
        #[arg(long)]
        command: Option<String>,
    },

    /// List all containers
    Ps,

    /// Show network, mount, and command details of a container
    Inspect {
        /// Container id or name
        container: ContainerId,
    },

    /// List the available container actions
    Actions,

    /// Run an action (STOP, REBOOT, PAUSE, RECOVER, KILL, DELETE) on a container
    Action {
        /// Action name
        action: ActionName,

        /// Container id or name
        container: ContainerId,
    },
}
