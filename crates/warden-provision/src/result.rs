//! Provisioning outcomes.
//!
//! One [`ProvisioningResult`] per request, success or not, carrying the
//! progress that was actually made. [`BatchSummary`] folds a whole run's
//! results into the numbers a report needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Outcome of provisioning a single user.
///
/// Failures keep whatever groups and policies were applied before the
/// failing step; nothing is rolled back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningResult {
    pub username: String,
    pub success: bool,
    /// Operator-facing text: a fixed success phrase or the mapped failure.
    pub message: String,
    pub groups_assigned: Vec<String>,
    pub policies_attached: Vec<String>,
    /// Locator of the escrowed credentials, once that step completed.
    pub credentials_location: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ProvisioningResult {
    pub fn success(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(username, true, message)
    }

    pub fn failure(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(username, false, message)
    }

    fn new(username: impl Into<String>, success: bool, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            success,
            message: message.into(),
            groups_assigned: Vec::new(),
            policies_attached: Vec::new(),
            credentials_location: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups_assigned = groups;
        self
    }

    #[must_use]
    pub fn with_policies(mut self, policies: Vec<String>) -> Self {
        self.policies_attached = policies;
        self
    }

    #[must_use]
    pub fn with_credentials_location(mut self, locator: impl Into<String>) -> Self {
        self.credentials_location = Some(locator.into());
        self
    }
}

/// One failed request in a batch, by name and reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedUser {
    pub username: String,
    pub error: String,
}

/// Aggregate numbers for one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Successful share of the batch, 0.0 to 100.0. Serialized as the
    /// one-decimal percentage string ("100.0%").
    #[serde(serialize_with = "serialize_rate")]
    pub success_rate: f64,
    pub users_provisioned: Vec<String>,
    pub users_failed: Vec<FailedUser>,
}

impl BatchSummary {
    /// Fold a run's results into a summary. An empty run rates 0.0, not
    /// 100.0: nothing was provisioned.
    pub fn from_results(results: &[ProvisioningResult]) -> Self {
        let users_provisioned: Vec<String> = results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.username.clone())
            .collect();
        let users_failed: Vec<FailedUser> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| FailedUser {
                username: r.username.clone(),
                error: r.message.clone(),
            })
            .collect();

        let total_processed = results.len();
        let successful = users_provisioned.len();
        let success_rate = if total_processed == 0 {
            0.0
        } else {
            successful as f64 / total_processed as f64 * 100.0
        };

        Self {
            total_processed,
            successful,
            failed: users_failed.len(),
            success_rate,
            users_provisioned,
            users_failed,
        }
    }

    /// Rate rendered the way it appears in exports, e.g. "66.7%".
    pub fn formatted_success_rate(&self) -> String {
        format!("{:.1}%", self.success_rate)
    }
}

fn serialize_rate<S>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{rate:.1}%"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(username: &str) -> ProvisioningResult {
        ProvisioningResult::success(username, "User provisioned successfully")
    }

    fn failed(username: &str, error: &str) -> ProvisioningResult {
        ProvisioningResult::failure(username, error)
    }

    #[test]
    fn test_builders_fill_progress_fields() {
        let result = ok("jdoe")
            .with_groups(vec!["StandardUsers".to_string()])
            .with_policies(vec!["arn:aws:iam::aws:policy/ReadOnlyAccess".to_string()])
            .with_credentials_location("secretsmanager:iam-credentials/IT/jdoe");

        assert!(result.success);
        assert_eq!(result.groups_assigned, vec!["StandardUsers"]);
        assert_eq!(
            result.credentials_location.as_deref(),
            Some("secretsmanager:iam-credentials/IT/jdoe")
        );
    }

    #[test]
    fn test_failure_starts_with_no_progress() {
        let result = failed("jdoe", "User jdoe already exists");
        assert!(!result.success);
        assert!(result.groups_assigned.is_empty());
        assert!(result.policies_attached.is_empty());
        assert!(result.credentials_location.is_none());
    }

    #[test]
    fn test_summary_counts_and_rate() {
        let results = vec![ok("alice"), failed("bob", "boom"), ok("carol")];
        let summary = BatchSummary::from_results(&results);

        assert_eq!(summary.total_processed, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.formatted_success_rate(), "66.7%");
        assert_eq!(summary.users_provisioned, vec!["alice", "carol"]);
        assert_eq!(summary.users_failed[0].username, "bob");
        assert_eq!(summary.users_failed[0].error, "boom");
    }

    #[test]
    fn test_empty_batch_rates_zero() {
        let summary = BatchSummary::from_results(&[]);
        assert_eq!(summary.total_processed, 0);
        assert_eq!(summary.formatted_success_rate(), "0.0%");
    }

    #[test]
    fn test_summary_serializes_rate_as_percentage_string() {
        let results = vec![ok("alice"), ok("bob")];
        let summary = BatchSummary::from_results(&results);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["total_processed"], 2);
        assert_eq!(json["success_rate"], "100.0%");
        assert_eq!(json["users_provisioned"][1], "bob");
        assert!(json["users_failed"].as_array().unwrap().is_empty());
    }
}
