//! Compliance finding types.
//!
//! Every rule violation (and the occasional explicit pass) is reported as a
//! [`Finding`]. Findings are plain data: the audit report and the CLI render
//! them, nothing mutates them after evaluation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How bad a finding is. Ordering goes from least to most severe, so
/// `Severity::Critical > Severity::High` holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of evaluating a rule against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    /// The rule does not apply to this resource.
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "COMPLIANT",
            ComplianceStatus::NonCompliant => "NON_COMPLIANT",
            ComplianceStatus::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One evaluated rule against one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub status: ComplianceStatus,
    pub resource_type: String,
    pub resource_id: String,
    pub description: String,
    pub recommendation: String,
    /// Rule-specific evidence (ages, counts, policy names).
    pub details: Value,
}

impl Finding {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rule_id: impl Into<String>,
        rule_name: impl Into<String>,
        severity: Severity,
        status: ComplianceStatus,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            rule_name: rule_name.into(),
            severity,
            status,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    pub fn is_non_compliant(&self) -> bool {
        self.status == ComplianceStatus::NonCompliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Info);
    }

    #[test]
    fn test_severity_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(Severity::Critical).unwrap(),
            json!("CRITICAL")
        );
        assert_eq!(serde_json::to_value(Severity::Info).unwrap(), json!("INFO"));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_value(ComplianceStatus::NonCompliant).unwrap(),
            json!("NON_COMPLIANT")
        );
        assert_eq!(
            serde_json::to_value(ComplianceStatus::NotApplicable).unwrap(),
            json!("N/A")
        );
    }

    #[test]
    fn test_finding_round_trips_details() {
        let finding = Finding::new(
            "CIS-1.4",
            "Access Key Rotation",
            Severity::Medium,
            ComplianceStatus::NonCompliant,
            "IAM Access Key",
            "alice/AKIATEST1",
            "Access key is 120 days old (max: 90)",
            "Rotate access keys at least every 90 days",
        )
        .with_details(json!({ "key_age_days": 120, "threshold": 90 }));

        assert!(finding.is_non_compliant());
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["severity"], "MEDIUM");
        assert_eq!(value["details"]["key_age_days"], 120);
    }
}
