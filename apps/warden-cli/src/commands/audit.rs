//! `warden audit` - scan IAM users for compliance violations.

use std::path::PathBuf;

use clap::Args;

use crate::backend;
use crate::error::CliResult;
use warden_audit::{AuditOptions, AuditReport, AuditRunner};
use warden_core::Severity;

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for the audit command
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Scan the live AWS account instead of the bundled demo fleet
    #[arg(long)]
    pub live: bool,

    /// Write the full JSON report to this path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

// ============================================================================
// Command Execution
// ============================================================================

pub async fn execute(args: AuditArgs) -> CliResult<()> {
    let source = backend::identity_source(args.live).await?;
    let options = AuditOptions {
        // Account-posture findings are canned; only the demo scan gets them.
        include_account_rules: !args.live,
        ..AuditOptions::default()
    };

    let report = AuditRunner::new(source, options).run().await?;
    print_report(&report);

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

// ============================================================================
// Output Formatting
// ============================================================================

fn print_report(report: &AuditReport) {
    println!();
    println!("{}", "=".repeat(60));
    println!("IAM COMPLIANCE AUDIT REPORT");
    println!("{}", "=".repeat(60));
    println!(
        "Scan time:      {}",
        report.scan_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Users scanned:  {}", report.total_users);
    println!("Total findings: {}", report.total_findings);
    println!();
    println!("Findings by severity:");
    println!("  CRITICAL: {}", report.findings_by_severity.critical);
    println!("  HIGH:     {}", report.findings_by_severity.high);
    println!("  MEDIUM:   {}", report.findings_by_severity.medium);
    println!("  LOW:      {}", report.findings_by_severity.low);
    println!();
    println!("Compliance score: {}", report.formatted_score());

    let escalations: Vec<_> = report.findings_at_least(Severity::High).collect();
    if !escalations.is_empty() {
        println!();
        println!("Critical and high findings:");
        for finding in escalations {
            println!();
            println!(
                "  [{}] {} ({})",
                finding.severity, finding.rule_name, finding.rule_id
            );
            println!(
                "    Resource: {} {}",
                finding.resource_type, finding.resource_id
            );
            println!("    Issue:    {}", finding.description);
            println!("    Fix:      {}", finding.recommendation);
        }
    }
    println!();
}
