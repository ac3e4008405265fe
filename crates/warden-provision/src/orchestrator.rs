//! The provisioning pipeline.
//!
//! One [`Provisioner`] drives the fixed step sequence for a request:
//! validate, create the user, assign groups, attach role policies, generate
//! a console password, create the login profile, escrow the credentials and
//! publish a notification. The first unrecoverable failure stops the
//! sequence; whatever was already applied is reported, never rolled back.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::password::{generate_password, DEFAULT_PASSWORD_LENGTH};
use crate::result::ProvisioningResult;
use crate::retry::{run_step, RetryPolicy};
use crate::tables;
use crate::ProvisionError;
use warden_connector::{ConnectorError, Directory, Notifier};
use warden_core::{ResourceTag, UserRequest};
use warden_secrets::{SecretError, SecretStore};

/// Where provisioned users sign in.
const DEFAULT_CONSOLE_URL: &str = "https://company.signin.aws.amazon.com/console";

/// Knobs for the provisioning pipeline.
#[derive(Debug, Clone)]
pub struct ProvisionerOptions {
    pub retry: RetryPolicy,
    pub password_length: usize,
    /// Force a password change at first sign-in.
    pub password_reset_required: bool,
    /// Console URL included with the escrowed credentials.
    pub console_url: String,
}

impl Default for ProvisionerOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            password_length: DEFAULT_PASSWORD_LENGTH,
            password_reset_required: true,
            console_url: DEFAULT_CONSOLE_URL.to_string(),
        }
    }
}

/// Drives the provisioning steps against the configured backends.
pub struct Provisioner {
    directory: Arc<dyn Directory>,
    secrets: Arc<dyn SecretStore>,
    notifier: Arc<dyn Notifier>,
    options: ProvisionerOptions,
}

impl Provisioner {
    pub fn new(
        directory: Arc<dyn Directory>,
        secrets: Arc<dyn SecretStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            directory,
            secrets,
            notifier,
            options: ProvisionerOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ProvisionerOptions) -> Self {
        self.options = options;
        self
    }

    /// Provision one user.
    ///
    /// Never returns an error: every failure is folded into the result,
    /// message mapped for operators and partial progress kept.
    pub async fn provision(&self, request: &UserRequest) -> ProvisioningResult {
        if let Err(invalid) = request.validate() {
            warn!(
                username = %request.username,
                reasons = %invalid,
                "request rejected before any backend call"
            );
            return ProvisioningResult::failure(
                &request.username,
                format!("Validation failed: {invalid}"),
            );
        }

        info!(
            username = %request.username,
            department = %request.department,
            role = %request.role,
            directory = self.directory.provider_type(),
            "provisioning user"
        );

        let mut groups_assigned = Vec::new();
        let mut policies_attached = Vec::new();

        match self
            .run_steps(request, &mut groups_assigned, &mut policies_attached)
            .await
        {
            Ok(locator) => {
                info!(
                    username = %request.username,
                    credentials = %locator,
                    "user provisioned"
                );
                ProvisioningResult::success(&request.username, "User provisioned successfully")
                    .with_groups(groups_assigned)
                    .with_policies(policies_attached)
                    .with_credentials_location(locator)
            }
            Err(err) => {
                error!(username = %request.username, error = %err, "provisioning failed");
                ProvisioningResult::failure(
                    &request.username,
                    failure_message(&request.username, &err),
                )
                .with_groups(groups_assigned)
                .with_policies(policies_attached)
            }
        }
    }

    async fn run_steps(
        &self,
        request: &UserRequest,
        groups_assigned: &mut Vec<String>,
        policies_attached: &mut Vec<String>,
    ) -> Result<String, ProvisionError> {
        let retry = &self.options.retry;
        let now = Utc::now();
        let tags = request.resource_tags(now);

        run_step("create_user", retry, || {
            self.directory.create_user(&request.username, &tags)
        })
        .await?;

        for group in tables::groups_for_department(&request.department) {
            let added = run_step("add_user_to_group", retry, || {
                self.directory.add_user_to_group(&request.username, &group)
            })
            .await;
            match added {
                Ok(()) => groups_assigned.push(group),
                // A group nobody created yet is dropped from the
                // assignment; it does not fail the user.
                Err(ConnectorError::NotFound { .. }) => {
                    warn!(
                        username = %request.username,
                        group = %group,
                        "group does not exist, dropped from assignment"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        for policy_arn in tables::role_policies(&request.role).iter().copied() {
            run_step("attach_user_policy", retry, || {
                self.directory
                    .attach_user_policy(&request.username, policy_arn)
            })
            .await?;
            policies_attached.push(policy_arn.to_string());
        }

        let password = generate_password(self.options.password_length);
        run_step("create_login_profile", retry, || {
            self.directory.create_login_profile(
                &request.username,
                &password,
                self.options.password_reset_required,
            )
        })
        .await?;

        let secret_name = format!(
            "iam-credentials/{}/{}",
            request.department, request.username
        );
        let payload = json!({
            "username": request.username,
            "email": request.email,
            "temporary_password": password,
            "console_url": self.options.console_url,
            "created_at": now,
            "requires_password_reset": self.options.password_reset_required,
        })
        .to_string();
        let secret_tags = vec![
            ResourceTag::new("Department", request.department.clone()),
            ResourceTag::new("ManagedBy", "IAM-Automation"),
            ResourceTag::new("CreatedDate", now.format("%Y-%m-%d").to_string()),
        ];
        let locator = run_step("store_credentials", retry, || {
            self.secrets.put_secret(&secret_name, &payload, &secret_tags)
        })
        .await?;

        // The event carries the locator, never the password itself.
        let subject = format!("IAM User Provisioned: {}", request.username);
        let event = json!({
            "event": "USER_PROVISIONED",
            "username": request.username,
            "email": request.email,
            "department": request.department,
            "credentials_location": &locator,
            "timestamp": Utc::now(),
        });
        run_step("notify", retry, || self.notifier.publish(&subject, &event)).await?;

        Ok(locator)
    }
}

/// Map a step failure onto its operator-facing message.
fn failure_message(username: &str, error: &ProvisionError) -> String {
    match error {
        ProvisionError::Connector(err) => match err {
            ConnectorError::AlreadyExists { .. } => format!("User {username} already exists"),
            ConnectorError::LimitExceeded { .. } => {
                "IAM user limit reached - contact AWS support".to_string()
            }
            ConnectorError::MalformedDocument { .. } => "Invalid policy document".to_string(),
            ConnectorError::NotFound { .. } => "Referenced resource not found".to_string(),
            ConnectorError::InvalidInput { message } => format!("Invalid input: {message}"),
            ConnectorError::ConnectionFailed { message, .. } => {
                format!("AWS connection error: {message}")
            }
            ConnectorError::ParameterValidation { message } => {
                format!("Parameter validation error: {message}")
            }
            other => other.to_string(),
        },
        ProvisionError::Secret(err) => match err {
            SecretError::ProviderUnavailable { detail, .. } => {
                format!("AWS connection error: {detail}")
            }
            SecretError::InvalidValue { detail, .. } => format!("Invalid input: {detail}"),
            other => other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages_follow_the_taxonomy() {
        let cases: Vec<(ProvisionError, &str)> = vec![
            (
                ConnectorError::already_exists("jdoe").into(),
                "User jdoe already exists",
            ),
            (
                ConnectorError::limit_exceeded("user quota reached").into(),
                "IAM user limit reached - contact AWS support",
            ),
            (
                ConnectorError::malformed_document("bad json").into(),
                "Invalid policy document",
            ),
            (
                ConnectorError::not_found("Ghost-Group").into(),
                "Referenced resource not found",
            ),
            (
                ConnectorError::invalid_input("bad character in path").into(),
                "Invalid input: bad character in path",
            ),
            (
                ConnectorError::connection_failed("connection refused").into(),
                "AWS connection error: connection refused",
            ),
            (
                ConnectorError::parameter_validation("password too short").into(),
                "Parameter validation error: password too short",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(failure_message("jdoe", &error), expected);
        }
    }

    #[test]
    fn test_unclassified_errors_keep_their_display_text() {
        let error: ProvisionError = ConnectorError::throttled("Rate exceeded").into();
        assert_eq!(
            failure_message("jdoe", &error),
            "request throttled: Rate exceeded"
        );

        let error: ProvisionError = SecretError::PermissionDenied {
            detail: "denied by resource policy".to_string(),
        }
        .into();
        assert_eq!(
            failure_message("jdoe", &error),
            "Permission denied: denied by resource policy"
        );
    }

    #[test]
    fn test_secret_transport_failures_read_as_connection_errors() {
        let error: ProvisionError = SecretError::ProviderUnavailable {
            provider: "aws".to_string(),
            detail: "endpoint unreachable".to_string(),
        }
        .into();
        assert_eq!(
            failure_message("jdoe", &error),
            "AWS connection error: endpoint unreachable"
        );
    }

    #[test]
    fn test_default_options() {
        let options = ProvisionerOptions::default();
        assert_eq!(options.password_length, 16);
        assert!(options.password_reset_required);
        assert!(options.console_url.contains("signin.aws.amazon.com"));
        assert_eq!(options.retry, RetryPolicy::default());
    }
}
