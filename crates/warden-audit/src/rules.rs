//! Compliance rules.
//!
//! Each check is a pure function from one [`IdentityRecord`] to zero or
//! more findings. The checks never talk to a backend; whatever snapshot the
//! identity source produced is what gets judged.

use chrono::{DateTime, Utc};
use serde_json::json;

use warden_core::{ComplianceStatus, Finding, IdentityRecord, Severity};

/// Managed policy names that grant blanket privileges.
const ADMIN_POLICIES: [&str; 2] = ["AdministratorAccess", "PowerUserAccess"];

/// Tunable rule thresholds, in whole days.
#[derive(Debug, Clone, Copy)]
pub struct AuditThresholds {
    /// Active access keys strictly older than this are stale.
    pub max_access_key_age_days: i64,
    /// Passwords unused strictly longer than this are dormant.
    pub max_unused_days: i64,
}

impl Default for AuditThresholds {
    fn default() -> Self {
        Self {
            max_access_key_age_days: 90,
            max_unused_days: 45,
        }
    }
}

/// Run every per-user check against one identity.
pub fn evaluate_identity(
    identity: &IdentityRecord,
    now: DateTime<Utc>,
    thresholds: &AuditThresholds,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    check_console_mfa(identity, &mut findings);
    check_access_key_age(identity, now, thresholds, &mut findings);
    check_unused_credentials(identity, now, thresholds, &mut findings);
    check_multiple_access_keys(identity, &mut findings);
    check_direct_policy_attachment(identity, &mut findings);
    check_admin_privileges(identity, &mut findings);
    findings
}

/// CIS 1.2: every user with console access must have MFA enabled.
fn check_console_mfa(identity: &IdentityRecord, findings: &mut Vec<Finding>) {
    if identity.has_console_access() && !identity.mfa_enabled() {
        findings.push(
            Finding::new(
                "CIS-1.2",
                "MFA for Console Users",
                Severity::High,
                ComplianceStatus::NonCompliant,
                "IAM User",
                identity.username.clone(),
                format!(
                    "User {} has console access but MFA is not enabled",
                    identity.username
                ),
                "Enable MFA for this user immediately",
            )
            .with_details(json!({ "has_console_access": true, "mfa_enabled": false })),
        );
    }
}

/// CIS 1.4: active access keys must be rotated within the threshold.
///
/// One finding per stale key; inactive keys are skipped entirely.
fn check_access_key_age(
    identity: &IdentityRecord,
    now: DateTime<Utc>,
    thresholds: &AuditThresholds,
    findings: &mut Vec<Finding>,
) {
    for key in identity.active_access_keys() {
        let age_days = key.age_days(now);
        if age_days > thresholds.max_access_key_age_days {
            findings.push(
                Finding::new(
                    "CIS-1.4",
                    "Access Key Rotation",
                    Severity::Medium,
                    ComplianceStatus::NonCompliant,
                    "IAM Access Key",
                    format!("{}/{}", identity.username, key.key_id),
                    format!(
                        "Access key is {age_days} days old (max: {})",
                        thresholds.max_access_key_age_days
                    ),
                    "Rotate access key immediately",
                )
                .with_details(json!({
                    "key_age_days": age_days,
                    "threshold": thresholds.max_access_key_age_days,
                })),
            );
        }
    }
}

/// CIS 1.3: passwords unused beyond the threshold should be disabled.
fn check_unused_credentials(
    identity: &IdentityRecord,
    now: DateTime<Utc>,
    thresholds: &AuditThresholds,
    findings: &mut Vec<Finding>,
) {
    let Some(days_unused) = identity.password_unused_days(now) else {
        return;
    };
    if days_unused > thresholds.max_unused_days {
        findings.push(
            Finding::new(
                "CIS-1.3",
                "Unused Credentials",
                Severity::Medium,
                ComplianceStatus::NonCompliant,
                "IAM User Password",
                identity.username.clone(),
                format!("Password unused for {days_unused} days"),
                "Disable or remove unused credentials",
            )
            .with_details(json!({
                "days_unused": days_unused,
                "threshold": thresholds.max_unused_days,
            })),
        );
    }
}

/// Best practice: at most one active access key per user.
fn check_multiple_access_keys(identity: &IdentityRecord, findings: &mut Vec<Finding>) {
    let active_keys = identity.active_access_keys().count();
    if active_keys > 1 {
        findings.push(
            Finding::new(
                "BP-1",
                "Multiple Access Keys",
                Severity::Low,
                ComplianceStatus::NonCompliant,
                "IAM User",
                identity.username.clone(),
                format!("User has {active_keys} active access keys"),
                "Remove unused access keys",
            )
            .with_details(json!({ "active_key_count": active_keys })),
        );
    }
}

/// Best practice: policies belong on groups, not users.
fn check_direct_policy_attachment(identity: &IdentityRecord, findings: &mut Vec<Finding>) {
    if identity.attached_policies.is_empty() {
        return;
    }
    let policy_names: Vec<&str> = identity
        .attached_policies
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    findings.push(
        Finding::new(
            "BP-2",
            "Direct Policy Attachment",
            Severity::Low,
            ComplianceStatus::NonCompliant,
            "IAM User",
            identity.username.clone(),
            format!(
                "User has {} directly attached policies",
                identity.attached_policies.len()
            ),
            "Use IAM groups for policy management",
        )
        .with_details(json!({ "policies": policy_names })),
    );
}

/// CIS 1.16: blanket-privilege policies must not be attached to users.
///
/// One finding per matching policy.
fn check_admin_privileges(identity: &IdentityRecord, findings: &mut Vec<Finding>) {
    for policy in &identity.attached_policies {
        if ADMIN_POLICIES.contains(&policy.name.as_str()) {
            findings.push(
                Finding::new(
                    "CIS-1.16",
                    "Admin Privilege Check",
                    Severity::Critical,
                    ComplianceStatus::NonCompliant,
                    "IAM User",
                    identity.username.clone(),
                    format!("User has {} attached directly", policy.name),
                    "Use least-privilege policies instead",
                )
                .with_details(json!({ "policy": policy.name })),
            );
        }
    }
}

/// The fixed account-level posture reported alongside the demo fleet: a
/// weak password-reuse policy and a clean root-usage check.
pub fn account_findings() -> Vec<Finding> {
    vec![
        Finding::new(
            "CIS-1.9",
            "Password Reuse Prevention",
            Severity::Medium,
            ComplianceStatus::NonCompliant,
            "Account Password Policy",
            "PasswordPolicy",
            "Password policy does not prevent reuse of last 24 passwords",
            "Set PasswordReusePrevention to 24",
        )
        .with_details(json!({ "current_value": 12, "required_value": 24 })),
        Finding::new(
            "CIS-1.1",
            "Root Account Usage",
            Severity::Info,
            ComplianceStatus::Compliant,
            "Root Account",
            "root",
            "Root account has not been used in the last 90 days",
            "Continue avoiding root account usage",
        )
        .with_details(json!({ "last_used": "Never or >90 days" })),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use warden_core::{AccessKey, AccessKeyStatus, AttachedPolicy};

    fn identity(username: &str) -> IdentityRecord {
        IdentityRecord::new(
            username,
            "AIDATEST00000000001",
            format!("arn:aws:iam::123456789012:user/{username}"),
            Utc::now() - Duration::days(100),
        )
    }

    fn rule_ids(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.rule_id.as_str()).collect()
    }

    #[test]
    fn test_console_without_mfa_is_flagged() {
        let now = Utc::now();
        let user = identity("alice").with_password_last_used(now - Duration::days(1));
        let findings = evaluate_identity(&user, now, &AuditThresholds::default());

        assert_eq!(rule_ids(&findings), vec!["CIS-1.2"]);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(
            findings[0].description,
            "User alice has console access but MFA is not enabled"
        );
    }

    #[test]
    fn test_user_without_console_is_not_flagged_for_mfa() {
        let now = Utc::now();
        let user = identity("robot");
        let findings = evaluate_identity(&user, now, &AuditThresholds::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_console_with_mfa_passes() {
        let now = Utc::now();
        let user = identity("alice")
            .with_password_last_used(now - Duration::days(1))
            .with_mfa_device("arn:aws:iam::123456789012:mfa/alice");
        let findings = evaluate_identity(&user, now, &AuditThresholds::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn test_key_age_boundary_is_strict() {
        let now = Utc::now();
        let thresholds = AuditThresholds::default();

        let on_threshold = identity("alice").with_access_key(AccessKey::new(
            "AKIATEST1",
            AccessKeyStatus::Active,
            now - Duration::days(90),
        ));
        assert!(evaluate_identity(&on_threshold, now, &thresholds).is_empty());

        let over_threshold = identity("alice").with_access_key(AccessKey::new(
            "AKIATEST1",
            AccessKeyStatus::Active,
            now - Duration::days(91),
        ));
        let findings = evaluate_identity(&over_threshold, now, &thresholds);
        assert_eq!(rule_ids(&findings), vec!["CIS-1.4"]);
        assert_eq!(findings[0].resource_id, "alice/AKIATEST1");
        assert_eq!(findings[0].description, "Access key is 91 days old (max: 90)");
        assert_eq!(findings[0].details["key_age_days"], 91);
    }

    #[test]
    fn test_inactive_keys_are_ignored() {
        let now = Utc::now();
        let user = identity("alice").with_access_key(AccessKey::new(
            "AKIATEST1",
            AccessKeyStatus::Inactive,
            now - Duration::days(500),
        ));
        assert!(evaluate_identity(&user, now, &AuditThresholds::default()).is_empty());
    }

    #[test]
    fn test_stale_keys_fire_once_per_key() {
        let now = Utc::now();
        let user = identity("alice")
            .with_access_key(AccessKey::new(
                "AKIATEST1",
                AccessKeyStatus::Active,
                now - Duration::days(120),
            ))
            .with_access_key(AccessKey::new(
                "AKIATEST2",
                AccessKeyStatus::Active,
                now - Duration::days(200),
            ));
        let findings = evaluate_identity(&user, now, &AuditThresholds::default());
        // Two stale keys plus the multiple-active-keys finding.
        assert_eq!(rule_ids(&findings), vec!["CIS-1.4", "CIS-1.4", "BP-1"]);
    }

    #[test]
    fn test_dormant_password_is_flagged() {
        let now = Utc::now();
        let thresholds = AuditThresholds::default();

        let fresh = identity("alice").with_password_last_used(now - Duration::days(45));
        let findings = evaluate_identity(&fresh, now, &thresholds);
        assert_eq!(rule_ids(&findings), vec!["CIS-1.2"]); // no MFA, but not dormant

        let dormant = identity("alice").with_password_last_used(now - Duration::days(46));
        let findings = evaluate_identity(&dormant, now, &thresholds);
        assert_eq!(rule_ids(&findings), vec!["CIS-1.2", "CIS-1.3"]);
        assert_eq!(findings[1].description, "Password unused for 46 days");
        assert_eq!(findings[1].resource_type, "IAM User Password");
    }

    #[test]
    fn test_direct_attachment_and_admin_both_fire() {
        let now = Utc::now();
        let user = identity("admin").with_attached_policy(AttachedPolicy::new(
            "AdministratorAccess",
            "arn:aws:iam::aws:policy/AdministratorAccess",
        ));
        let findings = evaluate_identity(&user, now, &AuditThresholds::default());

        assert_eq!(rule_ids(&findings), vec!["BP-2", "CIS-1.16"]);
        assert_eq!(findings[0].details["policies"][0], "AdministratorAccess");
        assert_eq!(findings[1].severity, Severity::Critical);
        assert_eq!(
            findings[1].description,
            "User has AdministratorAccess attached directly"
        );
    }

    #[test]
    fn test_non_admin_direct_policy_is_low_only() {
        let now = Utc::now();
        let user = identity("reader").with_attached_policy(AttachedPolicy::new(
            "ReadOnlyAccess",
            "arn:aws:iam::aws:policy/ReadOnlyAccess",
        ));
        let findings = evaluate_identity(&user, now, &AuditThresholds::default());
        assert_eq!(rule_ids(&findings), vec!["BP-2"]);
    }

    #[test]
    fn test_account_findings_shape() {
        let findings = account_findings();
        assert_eq!(rule_ids(&findings), vec!["CIS-1.9", "CIS-1.1"]);

        assert_eq!(findings[0].severity, Severity::Medium);
        assert!(findings[0].is_non_compliant());
        assert_eq!(findings[0].details["required_value"], 24);

        assert_eq!(findings[1].severity, Severity::Info);
        assert_eq!(findings[1].status, ComplianceStatus::Compliant);
    }
}
