//! # Warden Audit
//!
//! IAM compliance scanning: ask an identity source for every user, run the
//! CIS-style rule set over each snapshot, and assemble an [`AuditReport`]
//! with a severity breakdown and a compliance score.
//!
//! # Modules
//!
//! - [`rules`] - the per-user checks and account-posture findings
//! - [`report`] - report assembly and scoring
//! - [`runner`] - the scan loop over an [`warden_connector::IdentitySource`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use warden_audit::{AuditOptions, AuditRunner};
//! use warden_connector::DemoIdentitySource;
//!
//! # async fn run() -> Result<(), warden_audit::AuditError> {
//! let options = AuditOptions {
//!     include_account_rules: true,
//!     ..AuditOptions::default()
//! };
//! let report = AuditRunner::new(Arc::new(DemoIdentitySource::new()), options)
//!     .run()
//!     .await?;
//! assert_eq!(report.total_users, 5);
//! # Ok(())
//! # }
//! ```

pub mod report;
pub mod rules;
pub mod runner;

use thiserror::Error;

use warden_connector::ConnectorError;

// Re-export main types for convenient access
pub use report::{AuditReport, SeverityCounts};
pub use rules::{account_findings, evaluate_identity, AuditThresholds};
pub use runner::{AuditOptions, AuditRunner};

/// Errors returned by audit runs.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The identity source failed; the scan has nothing to evaluate.
    #[error(transparent)]
    Source(#[from] ConnectorError),
}
