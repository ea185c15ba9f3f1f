// ABOUTME: Entry point for the berth CLI application.
// ABOUTME: Parses arguments, connects to the runtime, and renders facade views.

mod cli;

use berth::config::Config;
use berth::error::{Error, Result};
use berth::facade::{ActionName, ContainerRecord, ImageRecord, LaunchRequest, RuntimeFacade};
use berth::output::{Output, OutputMode};
use berth::runtime::{BollardRuntime, RuntimeError, SystemOps, resolve_runtime};
use clap::Parser;
use cli::{Cli, Commands};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    if let Commands::Actions = cli.command {
        list_actions(output);
        return Ok(());
    }

    let config = load_config(&cli)?;
    let runtime = connect(&config).await?;
    let facade = RuntimeFacade::new(&runtime);

    match cli.command {
        Commands::Info => {
            let summary = facade.summary().await?;
            output.heading("Host");
            output.fields(&summary.host.fields(), &summary.host);
            output.heading("Engine");
            output.fields(&summary.engine.fields(), &summary.engine);
            output.heading("Storage");
            let storage: Vec<(&str, String)> = summary
                .storage
                .iter()
                .map(|(label, value)| (label.as_str(), value.clone()))
                .collect();
            output.fields(&storage, &summary.storage);
        }
        Commands::Images => {
            let images = facade.images().await?;
            let rows: Vec<Vec<String>> = images.iter().map(ImageRecord::row).collect();
            output.table(&ImageRecord::HEADERS, &rows, &images);
        }
        Commands::Rmi { image } => {
            facade.remove_image(&image).await?;
            output.success(&format!("Removed image {}", image));
        }
        Commands::Save { image, path } => {
            let written = facade.save_image(&image, &path).await?;
            output.success(&format!(
                "Saved {} to {} ({} bytes)",
                image,
                path.display(),
                written
            ));
        }
        Commands::Run {
            image,
            name,
            command,
        } => {
            let request = LaunchRequest {
                image,
                name,
                command,
            };
            let id = facade.launch(&request).await?;
            output.success(&format!("Started container {}", id.short()));
        }
        Commands::Ps => {
            let containers = facade.containers().await?;
            let rows: Vec<Vec<String>> = containers.iter().map(ContainerRecord::row).collect();
            output.table(&ContainerRecord::HEADERS, &rows, &containers);
        }
        Commands::Inspect { container } => {
            let detail = facade.container_detail(&container).await?;
            output.fields(&detail.display_fields(), &detail);
        }
        Commands::Action { action, container } => {
            facade.dispatch(action, &container).await?;
            output.success(&format!("{} {}", action, container));
        }
        Commands::Actions => list_actions(output),
    }

    Ok(())
}

fn list_actions(output: &Output) {
    let rows: Vec<Vec<String>> = ActionName::ALL
        .iter()
        .map(|action| vec![action.as_str().to_string(), action.operation().to_string()])
        .collect();
    output.table(&["ACTION", "OPERATION"], &rows, &ActionName::ALL);
}

fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => Config::load(path),
        None => {
            let cwd = env::current_dir()?;
            Config::discover_or_default(&cwd)
        }
    }
}

/// Open one runtime client for this invocation and check the daemon answers.
async fn connect(config: &Config) -> Result<BollardRuntime> {
    let info = resolve_runtime(&config.runtime_config()).map_err(RuntimeError::from)?;
    tracing::debug!(runtime = %info.runtime_type, socket = %info.socket_path, "using runtime");

    let runtime = BollardRuntime::connect(&info, config.timeout).map_err(RuntimeError::from)?;
    runtime.ping().await.map_err(RuntimeError::from)?;
    Ok(runtime)
}
