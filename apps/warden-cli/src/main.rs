//! warden CLI - IAM compliance auditing and user provisioning
//!
//! This CLI enables operators to:
//! - Audit IAM users against the compliance rule set
//! - Provision a single IAM user with groups, policies and credentials
//! - Provision a whole CSV of users in one paced batch
//!
//! Both commands run against bundled demo backends by default; `--live`
//! switches to the real AWS account.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod backend;
mod commands;
mod error;

use error::CliResult;

/// warden - IAM compliance audit and provisioning
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan IAM users for compliance violations
    Audit(commands::audit::AuditArgs),

    /// Provision IAM users
    Provision(commands::provision::ProvisionArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Findings and step failures surface as warnings; RUST_LOG opts into
    // the full step-by-step trail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Audit(args) => commands::audit::execute(args).await,
        Commands::Provision(args) => commands::provision::execute(args).await,
    }
}
