//! Audit report assembly.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use warden_core::{Finding, Severity};

/// Finding counts bucketed by severity.
///
/// Info findings are deliberately absent; the severity breakdown tracks
/// actionable work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    fn tally(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Info => {}
            }
        }
        counts
    }
}

/// One completed scan: every finding plus the aggregate numbers.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub scan_timestamp: DateTime<Utc>,
    pub total_users: usize,
    pub total_findings: usize,
    pub findings_by_severity: SeverityCounts,
    /// Share of findings that passed, 0.0 to 100.0. Serialized as the
    /// one-decimal percentage string ("92.5%").
    #[serde(serialize_with = "serialize_score")]
    pub compliance_score: f64,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn from_findings(
        findings: Vec<Finding>,
        total_users: usize,
        scan_timestamp: DateTime<Utc>,
    ) -> Self {
        let total = findings.len();
        let non_compliant = findings.iter().filter(|f| f.is_non_compliant()).count();
        let compliance_score = (total - non_compliant) as f64 / total.max(1) as f64 * 100.0;

        Self {
            scan_timestamp,
            total_users,
            total_findings: total,
            findings_by_severity: SeverityCounts::tally(&findings),
            compliance_score,
            findings,
        }
    }

    /// Score rendered the way it appears in exports.
    pub fn formatted_score(&self) -> String {
        format!("{:.1}%", self.compliance_score)
    }

    /// Findings at or above `severity`, in evaluation order.
    pub fn findings_at_least(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.severity >= severity)
    }
}

fn serialize_score<S>(score: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{score:.1}%"))
}
