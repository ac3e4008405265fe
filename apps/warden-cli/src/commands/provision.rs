//! `warden provision` - create IAM users with groups, policies and
//! escrowed credentials.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::backend;
use crate::error::CliResult;
use warden_core::UserRequest;
use warden_provision::{
    read_requests, BatchOptions, BatchRunner, BatchSummary, Provisioner, ProvisioningResult,
};

// ============================================================================
// Command Arguments
// ============================================================================

/// Provisioning commands
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    #[command(subcommand)]
    pub command: ProvisionCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProvisionCommands {
    /// Provision a single user
    User(UserArgs),

    /// Provision every user in a CSV file
    Batch(BatchArgs),
}

/// Arguments for provisioning one user
#[derive(Args, Debug)]
pub struct UserArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub department: String,

    #[arg(long)]
    pub role: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Manager recorded on the user's tags
    #[arg(long)]
    pub manager: Option<String>,

    /// Provision into the live AWS account
    #[arg(long)]
    pub live: bool,

    /// SNS topic for provisioning events (required in live mode)
    #[arg(long, env = "WARDEN_SNS_TOPIC_ARN")]
    pub topic_arn: Option<String>,
}

/// Arguments for bulk provisioning
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV file with one user per row
    #[arg(long)]
    pub csv: PathBuf,

    /// Pause between consecutive requests, in milliseconds
    #[arg(long, default_value = "100")]
    pub pause_ms: u64,

    /// Provision into the live AWS account
    #[arg(long)]
    pub live: bool,

    /// SNS topic for provisioning events (required in live mode)
    #[arg(long, env = "WARDEN_SNS_TOPIC_ARN")]
    pub topic_arn: Option<String>,

    /// Write the JSON summary to this path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

// ============================================================================
// Command Execution
// ============================================================================

pub async fn execute(args: ProvisionArgs) -> CliResult<()> {
    match args.command {
        ProvisionCommands::User(args) => execute_user(args).await,
        ProvisionCommands::Batch(args) => execute_batch(args).await,
    }
}

/// A failed provisioning attempt is reported in the result output, not as
/// a process error; non-zero exits are reserved for unusable input or an
/// unusable AWS environment.
async fn execute_user(args: UserArgs) -> CliResult<()> {
    let backend = backend::provisioning_backend(args.live, args.topic_arn.as_deref()).await?;
    let provisioner = Provisioner::new(backend.directory, backend.secrets, backend.notifier);

    let request = UserRequest {
        username: args.username,
        email: args.email,
        department: args.department,
        role: args.role,
        first_name: args.first_name,
        last_name: args.last_name,
        manager: args.manager,
    };

    let result = provisioner.provision(&request).await;
    print_result(&result);

    Ok(())
}

async fn execute_batch(args: BatchArgs) -> CliResult<()> {
    let requests = read_requests(&args.csv)?;

    let backend = backend::provisioning_backend(args.live, args.topic_arn.as_deref()).await?;
    let provisioner = Provisioner::new(backend.directory, backend.secrets, backend.notifier);
    let runner = BatchRunner::new(provisioner).with_options(BatchOptions {
        pause: Duration::from_millis(args.pause_ms),
    });

    let results = runner.run(&requests).await;
    let summary = BatchSummary::from_results(&results);
    print_summary(&summary);

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

// ============================================================================
// Output Formatting
// ============================================================================

fn print_result(result: &ProvisioningResult) {
    println!();
    println!("{}", "=".repeat(60));
    if result.success {
        println!("PROVISIONED {}", result.username);
    } else {
        println!("FAILED {}", result.username);
    }
    println!("{}", "=".repeat(60));
    println!("Message: {}", result.message);
    if !result.groups_assigned.is_empty() {
        println!("Groups:  {}", result.groups_assigned.join(", "));
    }
    if !result.policies_attached.is_empty() {
        println!("Policies:");
        for arn in &result.policies_attached {
            println!("  {arn}");
        }
    }
    if let Some(location) = &result.credentials_location {
        println!("Credentials: {location}");
    }
    println!();
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", "=".repeat(60));
    println!("BATCH PROVISIONING SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total processed: {}", summary.total_processed);
    println!("Successful:      {}", summary.successful);
    println!("Failed:          {}", summary.failed);
    println!("Success rate:    {}", summary.formatted_success_rate());
    if !summary.users_failed.is_empty() {
        println!();
        println!("Failures:");
        for failed in &summary.users_failed {
            println!("  {}: {}", failed.username, failed.error);
        }
    }
    println!();
}
