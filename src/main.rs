// ABOUTME: Entry point for the gantry CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use gantry::config::{self, Config};
use gantry::deploy::SlotController;
use gantry::error::Result;
use gantry::management::{ManagementClient, ManagementTransport, RetryingApi, SlotApi};
use gantry::retry::Retrier;
use std::env;
use std::path::Path;
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
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { force } = cli.command {
        let cwd = env::current_dir().expect("Failed to get current directory");
        return config::init_config(&cwd, force);
    }

    let config = load_config(cli.config.as_deref())?;
    let controller = build_controller(&config)?;

    match cli.command {
        Commands::Init { .. } => unreachable!("handled above"),
        Commands::Deploy {
            upgrade,
            fallback_to_replace,
        } => deploy(&controller, &config, upgrade, fallback_to_replace).await,
        Commands::Delete => {
            println!(
                "Deleting deployment in {}/{}",
                config.service_name, config.slot
            );
            controller.delete_deployment().await?;
            println!("Delete complete!");
            Ok(())
        }
        Commands::Status => {
            let status = controller.deployment_status().await?;
            println!("Service: {}", config.service_name);
            println!("Slot: {}", config.slot);
            println!("Status: {status}");
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let cwd = env::current_dir().expect("Failed to get current directory");
            Config::discover(&cwd)
        }
    }
}

/// Wire up the full client stack: transport, protocol client, retry-wrapped
/// API, slot controller.
fn build_controller(
    config: &Config,
) -> Result<SlotController<RetryingApi<ManagementClient<ManagementTransport>>>> {
    let transport = ManagementTransport::new(&config.certificate)?;
    let client = ManagementClient::new(transport);
    let retrier = Retrier::new(config.max_retries, config.retry_interval);
    let api = RetryingApi::new(client, retrier);
    Ok(SlotController::new(api, config.slot_ref()))
}

/// Deploy to the configured slot, upgrading in place when requested and
/// possible.
async fn deploy<A: SlotApi>(
    controller: &SlotController<A>,
    config: &Config,
    upgrade: bool,
    fallback_to_replace: bool,
) -> Result<()> {
    let payload = config.payload()?;

    println!(
        "Deploying {} to {}/{}",
        payload.name, config.service_name, config.slot
    );

    if upgrade && controller.deployment_exists().await? {
        println!("  → Upgrading in place...");
        match controller.upgrade_deployment(&payload).await {
            Ok(()) => {}
            Err(e) if e.is_payload_rejection() && fallback_to_replace => {
                eprintln!("  ✗ Upgrade rejected: {e}");
                println!("  → Falling back to replace...");
                controller.create_or_replace_deployment(&payload).await?;
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        println!("  → Replacing deployment...");
        controller.create_or_replace_deployment(&payload).await?;
    }

    println!("Deployment complete!");
    Ok(())
}
