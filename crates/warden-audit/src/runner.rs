//! Audit orchestration: identity source in, report out.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::report::AuditReport;
use crate::rules::{account_findings, evaluate_identity, AuditThresholds};
use crate::AuditError;
use warden_connector::IdentitySource;

/// Options controlling a scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditOptions {
    pub thresholds: AuditThresholds,
    /// Emit the fixed account-posture findings. Only the demo scan does
    /// this; live scans report user-level findings only.
    pub include_account_rules: bool,
}

/// Drives one compliance scan over an identity source.
pub struct AuditRunner {
    source: Arc<dyn IdentitySource>,
    options: AuditOptions,
}

impl AuditRunner {
    pub fn new(source: Arc<dyn IdentitySource>, options: AuditOptions) -> Self {
        Self { source, options }
    }

    /// Scan every identity, evaluate the rules, assemble the report.
    ///
    /// Every non-compliant finding is also emitted as a warning log so the
    /// scan leaves an operator trail even when the report goes unread.
    pub async fn run(&self) -> Result<AuditReport, AuditError> {
        info!(
            provider = self.source.provider_type(),
            "starting IAM compliance audit"
        );

        let identities = self.source.list_identities().await?;
        let now = Utc::now();

        let mut findings = Vec::new();
        for identity in &identities {
            findings.extend(evaluate_identity(identity, now, &self.options.thresholds));
        }
        if self.options.include_account_rules {
            findings.extend(account_findings());
        }

        for finding in &findings {
            if finding.is_non_compliant() {
                warn!(
                    rule = %finding.rule_id,
                    resource = %finding.resource_id,
                    severity = %finding.severity,
                    "non-compliant: {}",
                    finding.description
                );
            }
        }

        let report = AuditReport::from_findings(findings, identities.len(), now);
        info!(
            users = report.total_users,
            findings = report.total_findings,
            score = %report.formatted_score(),
            "audit complete"
        );
        Ok(report)
    }
}
