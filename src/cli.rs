// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Deploys packaged applications to hosted-service deployment slots")]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to gantry.yml in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new gantry.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Replace (or upgrade) the deployment in the configured slot
    Deploy {
        /// Upgrade in place when a deployment already exists
        #[arg(long)]
        upgrade: bool,

        /// Fall back to delete-and-recreate when the service rejects the
        /// upgrade payload
        #[arg(long, requires = "upgrade")]
        fallback_to_replace: bool,
    },

    /// Delete the deployment in the configured slot
    Delete,

    /// Show the observed status of the configured slot
    Status,
}
