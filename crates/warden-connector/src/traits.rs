//! Backend capability traits
//!
//! Each seam the audit and provisioning flows depend on is one small trait
//! with a demo implementation and an AWS implementation. Callers hold
//! `Arc<dyn Trait>` and never know which one they got.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConnectorResult;
use warden_core::{IdentityRecord, ResourceTag};

/// Read-only source of identity snapshots for the audit.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Short provider name for logging ("demo", "aws").
    fn provider_type(&self) -> &'static str;

    /// Fetch every user the source knows about, fully enriched (MFA
    /// devices, access keys, attached policies, groups).
    async fn list_identities(&self) -> ConnectorResult<Vec<IdentityRecord>>;
}

/// Write access to the user directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Short provider name for logging ("demo", "aws").
    fn provider_type(&self) -> &'static str;

    /// Create a user with the given resource tags.
    ///
    /// Fails with `AlreadyExists` when the username is taken.
    async fn create_user(&self, username: &str, tags: &[ResourceTag]) -> ConnectorResult<()>;

    /// Add an existing user to a group.
    ///
    /// Fails with `NotFound` when the group does not exist.
    async fn add_user_to_group(&self, username: &str, group: &str) -> ConnectorResult<()>;

    /// Attach a managed policy directly to a user.
    async fn attach_user_policy(&self, username: &str, policy_arn: &str) -> ConnectorResult<()>;

    /// Give the user a console password.
    ///
    /// `reset_required` forces a password change at first sign-in.
    async fn create_login_profile(
        &self,
        username: &str,
        password: &str,
        reset_required: bool,
    ) -> ConnectorResult<()>;
}

/// Outbound event channel for provisioning notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short provider name for logging ("demo", "aws").
    fn provider_type(&self) -> &'static str;

    /// Publish a structured event. Delivery is fire-and-forget; the payload
    /// must not contain credentials.
    async fn publish(&self, subject: &str, message: &Value) -> ConnectorResult<()>;
}
