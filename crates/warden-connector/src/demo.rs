//! In-memory demo backends.
//!
//! The demo providers serve a fixed five-user fleet with a known compliance
//! posture and accept provisioning writes without touching AWS. They back
//! the default CLI mode and most of the test suite.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{ConnectorError, ConnectorResult};
use crate::traits::{Directory, IdentitySource, Notifier};
use warden_core::{AccessKey, AccessKeyStatus, AttachedPolicy, IdentityRecord, ResourceTag};

fn user_arn(username: &str) -> String {
    format!("arn:aws:iam::123456789012:user/{username}")
}

fn mfa_arn(username: &str) -> String {
    format!("arn:aws:iam::123456789012:mfa/{username}")
}

/// The fixed demo fleet, aged relative to `now`.
///
/// The posture is deliberately mixed: an admin without MFA holding a stale
/// key and a direct AdministratorAccess attachment, a dormant power user, a
/// service account with two active keys, and two well-behaved users.
pub fn demo_fleet(now: DateTime<Utc>) -> Vec<IdentityRecord> {
    vec![
        IdentityRecord::new(
            "admin_user",
            "AIDAEXAMPLE1",
            user_arn("admin_user"),
            now - Duration::days(400),
        )
        .with_password_last_used(now - Duration::days(5))
        .with_access_key(AccessKey::new(
            "AKIAEXAMPLE1",
            AccessKeyStatus::Active,
            now - Duration::days(200),
        ))
        .with_attached_policy(AttachedPolicy::new(
            "AdministratorAccess",
            "arn:aws:iam::aws:policy/AdministratorAccess",
        ))
        .with_group("Administrators"),
        IdentityRecord::new(
            "developer_jane",
            "AIDAEXAMPLE2",
            user_arn("developer_jane"),
            now - Duration::days(180),
        )
        .with_password_last_used(now - Duration::days(2))
        .with_mfa_device(mfa_arn("developer_jane"))
        .with_access_key(AccessKey::new(
            "AKIAEXAMPLE2",
            AccessKeyStatus::Active,
            now - Duration::days(60),
        ))
        .with_group("Developers"),
        IdentityRecord::new(
            "inactive_user",
            "AIDAEXAMPLE3",
            user_arn("inactive_user"),
            now - Duration::days(365),
        )
        .with_password_last_used(now - Duration::days(120))
        .with_access_key(AccessKey::new(
            "AKIAEXAMPLE3",
            AccessKeyStatus::Active,
            now - Duration::days(300),
        ))
        .with_attached_policy(AttachedPolicy::new(
            "PowerUserAccess",
            "arn:aws:iam::aws:policy/PowerUserAccess",
        )),
        IdentityRecord::new(
            "service_account",
            "AIDAEXAMPLE4",
            user_arn("service_account"),
            now - Duration::days(500),
        )
        .with_access_key(AccessKey::new(
            "AKIAEXAMPLE4",
            AccessKeyStatus::Active,
            now - Duration::days(500),
        ))
        .with_access_key(AccessKey::new(
            "AKIAEXAMPLE5",
            AccessKeyStatus::Active,
            now - Duration::days(30),
        ))
        .with_group("ServiceAccounts"),
        IdentityRecord::new(
            "compliant_user",
            "AIDAEXAMPLE5",
            user_arn("compliant_user"),
            now - Duration::days(60),
        )
        .with_password_last_used(now - Duration::days(1))
        .with_mfa_device(mfa_arn("compliant_user"))
        .with_access_key(AccessKey::new(
            "AKIAEXAMPLE6",
            AccessKeyStatus::Active,
            now - Duration::days(30),
        ))
        .with_group("StandardUsers"),
    ]
}

/// Identity source serving the demo fleet.
#[derive(Debug, Default)]
pub struct DemoIdentitySource;

impl DemoIdentitySource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentitySource for DemoIdentitySource {
    fn provider_type(&self) -> &'static str {
        "demo"
    }

    async fn list_identities(&self) -> ConnectorResult<Vec<IdentityRecord>> {
        let fleet = demo_fleet(Utc::now());
        info!(users = fleet.len(), "serving demo identity fleet");
        Ok(fleet)
    }
}

/// What the demo directory recorded for one provisioned user.
#[derive(Debug, Clone, Default)]
pub struct DemoUserState {
    pub tags: Vec<ResourceTag>,
    pub groups: Vec<String>,
    pub policies: Vec<String>,
    /// `Some(reset_required)` once a login profile exists.
    pub login_profile: Option<bool>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<String, DemoUserState>,
    missing_groups: HashSet<String>,
}

/// In-memory user directory.
#[derive(Debug, Default)]
pub struct DemoDirectory {
    state: Mutex<DirectoryState>,
}

impl DemoDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a group absent so membership calls against it fail the way
    /// a missing IAM group would.
    pub async fn mark_group_missing(&self, group: impl Into<String>) {
        self.state.lock().await.missing_groups.insert(group.into());
    }

    /// Snapshot of everything recorded for `username`.
    pub async fn user_state(&self, username: &str) -> Option<DemoUserState> {
        self.state.lock().await.users.get(username).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }
}

#[async_trait]
impl Directory for DemoDirectory {
    fn provider_type(&self) -> &'static str {
        "demo"
    }

    async fn create_user(&self, username: &str, tags: &[ResourceTag]) -> ConnectorResult<()> {
        let mut state = self.state.lock().await;
        if state.users.contains_key(username) {
            return Err(ConnectorError::already_exists(username));
        }
        state.users.insert(
            username.to_string(),
            DemoUserState {
                tags: tags.to_vec(),
                ..DemoUserState::default()
            },
        );
        info!(username = %username, "created user");
        Ok(())
    }

    async fn add_user_to_group(&self, username: &str, group: &str) -> ConnectorResult<()> {
        let mut state = self.state.lock().await;
        if state.missing_groups.contains(group) {
            return Err(ConnectorError::not_found(group));
        }
        let user = state
            .users
            .get_mut(username)
            .ok_or_else(|| ConnectorError::not_found(username))?;
        user.groups.push(group.to_string());
        info!(username = %username, group = %group, "added user to group");
        Ok(())
    }

    async fn attach_user_policy(&self, username: &str, policy_arn: &str) -> ConnectorResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(username)
            .ok_or_else(|| ConnectorError::not_found(username))?;
        user.policies.push(policy_arn.to_string());
        info!(username = %username, policy = %policy_arn, "attached policy");
        Ok(())
    }

    async fn create_login_profile(
        &self,
        username: &str,
        _password: &str,
        reset_required: bool,
    ) -> ConnectorResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(username)
            .ok_or_else(|| ConnectorError::not_found(username))?;
        if user.login_profile.is_some() {
            return Err(ConnectorError::already_exists(format!(
                "login profile for {username}"
            )));
        }
        user.login_profile = Some(reset_required);
        info!(username = %username, "created login profile");
        Ok(())
    }
}

/// A notification captured by the demo notifier.
#[derive(Debug, Clone)]
pub struct PublishedMessage {
    pub subject: String,
    pub message: Value,
}

/// Notifier that records events instead of publishing them.
#[derive(Debug, Default)]
pub struct DemoNotifier {
    published: Mutex<Vec<PublishedMessage>>,
}

impl DemoNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, in order.
    pub async fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for DemoNotifier {
    fn provider_type(&self) -> &'static str {
        "demo"
    }

    async fn publish(&self, subject: &str, message: &Value) -> ConnectorResult<()> {
        self.published.lock().await.push(PublishedMessage {
            subject: subject.to_string(),
            message: message.clone(),
        });
        info!(subject = %subject, "recorded notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_fleet_shape() {
        let now = Utc::now();
        let fleet = demo_fleet(now);
        assert_eq!(fleet.len(), 5);

        let usernames: Vec<_> = fleet.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(
            usernames,
            vec![
                "admin_user",
                "developer_jane",
                "inactive_user",
                "service_account",
                "compliant_user"
            ]
        );

        let admin = &fleet[0];
        assert!(admin.has_console_access());
        assert!(!admin.mfa_enabled());
        assert_eq!(admin.access_keys[0].age_days(now), 200);

        let service = &fleet[3];
        assert!(!service.has_console_access());
        assert_eq!(service.active_access_keys().count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_user_is_rejected() {
        let directory = DemoDirectory::new();
        directory.create_user("jdoe", &[]).await.unwrap();

        let err = directory.create_user("jdoe", &[]).await.unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
        assert_eq!(directory.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_group_fails_membership() {
        let directory = DemoDirectory::new();
        directory.create_user("jdoe", &[]).await.unwrap();
        directory.mark_group_missing("Ghost-Group").await;

        let err = directory
            .add_user_to_group("jdoe", "Ghost-Group")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");

        directory
            .add_user_to_group("jdoe", "Engineering-Users")
            .await
            .unwrap();
        let state = directory.user_state("jdoe").await.unwrap();
        assert_eq!(state.groups, vec!["Engineering-Users"]);
    }

    #[tokio::test]
    async fn test_login_profile_recorded_once() {
        let directory = DemoDirectory::new();
        directory.create_user("jdoe", &[]).await.unwrap();
        directory
            .create_login_profile("jdoe", "s3cret!", true)
            .await
            .unwrap();

        let state = directory.user_state("jdoe").await.unwrap();
        assert_eq!(state.login_profile, Some(true));

        let err = directory
            .create_login_profile("jdoe", "s3cret!", true)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn test_notifier_records_in_order() {
        let notifier = DemoNotifier::new();
        notifier
            .publish("first", &serde_json::json!({ "event": "A" }))
            .await
            .unwrap();
        notifier
            .publish("second", &serde_json::json!({ "event": "B" }))
            .await
            .unwrap();

        let published = notifier.published().await;
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].subject, "first");
        assert_eq!(published[1].message["event"], "B");
    }
}
