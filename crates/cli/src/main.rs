//! Vertex AI Search for Retail CLI - deployment tooling for the MCP server.
//!
//! # Usage
//!
//! ```bash
//! # Show the Cloud Run deploy command for the active gcloud project
//! vr-cli deploy --service-name retail-mcp --dry-run
//!
//! # Deploy to a specific project and region
//! vr-cli deploy --project-id my-project --region europe-west1 --service-name retail-mcp
//! ```
//!
//! # Commands
//!
//! - `deploy` - Deploy the MCP server container to Cloud Run

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::deploy::{self, DeployArgs, SystemGcloud};

#[derive(Parser)]
#[command(name = "vr-cli")]
#[command(author, version, about = "Vertex AI Search for Retail MCP tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the MCP server to Google Cloud Run
    Deploy(DeployArgs),
}

fn main() {
    // Load .env before parsing so APP_* defaults can come from it
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), deploy::DeployError> {
    match &cli.command {
        Commands::Deploy(args) => {
            deploy::run(args, &SystemGcloud)?;
        }
    }
    Ok(())
}
