mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use typesense_cluster::{ClusterId, ClusterResource, schema};

use crate::config::load_desired;
use crate::error::{CliError, error_chain};

const PROVIDER_TYPE_NAME: &str = "typesense";

/// Manage a Typesense Cloud cluster and print its state as JSON.
#[derive(Debug, Parser)]
#[command(name = "typesense-ctl", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a cluster and wait until it has finished provisioning.
    Create {
        /// Desired config as JSON (`-` for stdin).
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Refresh the state of an existing cluster.
    Read { id: String },
    /// Apply name and capacity auto-upgrade changes in place.
    Update {
        id: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Request termination of a cluster.
    Delete { id: String },
    /// Adopt an existing cluster by id.
    Import { id: String },
    /// Print the resource schema.
    Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command, ClusterResource::from_env).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(partial) = e.partial_state() {
                println!("{partial}");
            }
            tracing::error!(error = %error_chain(&e), "command failed");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Runs one subcommand. `connect` is only invoked by commands that talk to
/// the control plane.
async fn run(
    command: Command,
    connect: impl FnOnce() -> typesense_cluster::Result<ClusterResource>,
) -> Result<serde_json::Value, CliError> {
    let output = match command {
        Command::Schema => serde_json::to_value(schema::resource_schema(PROVIDER_TYPE_NAME))?,
        Command::Create { config } => {
            let desired = load_desired(&config).await?;
            let state = connect()?.create(&desired, interrupt_signal()).await?;
            serde_json::to_value(state)?
        }
        Command::Read { id } => match connect()?.read(&ClusterId(id)).await {
            Ok(state) => serde_json::to_value(state)?,
            Err(e) if e.is_not_found() => {
                tracing::warn!(error = %e, "cluster is gone, drop it from state");
                serde_json::Value::Null
            }
            Err(e) => return Err(e.into()),
        },
        Command::Update { id, config } => {
            let desired = load_desired(&config).await?;
            let state = connect()?.update(&ClusterId(id), &desired).await?;
            serde_json::to_value(state)?
        }
        Command::Delete { id } => {
            let id = ClusterId(id);
            connect()?.delete(&id).await?;
            serde_json::json!({ "deleted": id })
        }
        Command::Import { id } => serde_json::json!({ "id": connect()?.import(&id) }),
    };

    Ok(output)
}

/// Flips to `true` on Ctrl-C so a pending provisioning wait can stop.
fn interrupt_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling wait");
            let _ = tx.send(true);
        }
    });
    rx
}
