//! Identity snapshot types consumed by the compliance rules.
//!
//! An [`IdentityRecord`] is a point-in-time view of one IAM user: console
//! password usage, MFA devices, access keys, directly attached policies and
//! group memberships. Identity sources produce these records; the audit
//! rules only ever read them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an access key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessKeyStatus {
    Active,
    Inactive,
}

impl AccessKeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKeyStatus::Active => "Active",
            AccessKeyStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for AccessKeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One access key attached to an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessKey {
    pub key_id: String,
    pub status: AccessKeyStatus,
    pub created_at: DateTime<Utc>,
}

impl AccessKey {
    pub fn new(
        key_id: impl Into<String>,
        status: AccessKeyStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            status,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccessKeyStatus::Active
    }

    /// Whole days elapsed since the key was created.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_days()
    }
}

/// A managed policy attached directly to an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachedPolicy {
    pub name: String,
    pub arn: String,
}

impl AttachedPolicy {
    pub fn new(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// Point-in-time view of one IAM user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub username: String,
    pub user_id: String,
    pub arn: String,
    pub created_at: DateTime<Utc>,
    /// Last console sign-in; `None` when the user has never used a password.
    pub password_last_used: Option<DateTime<Utc>>,
    /// Serial numbers of registered MFA devices.
    pub mfa_devices: Vec<String>,
    pub access_keys: Vec<AccessKey>,
    pub attached_policies: Vec<AttachedPolicy>,
    pub groups: Vec<String>,
}

impl IdentityRecord {
    pub fn new(
        username: impl Into<String>,
        user_id: impl Into<String>,
        arn: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            user_id: user_id.into(),
            arn: arn.into(),
            created_at,
            password_last_used: None,
            mfa_devices: Vec::new(),
            access_keys: Vec::new(),
            attached_policies: Vec::new(),
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_password_last_used(mut self, at: DateTime<Utc>) -> Self {
        self.password_last_used = Some(at);
        self
    }

    #[must_use]
    pub fn with_mfa_device(mut self, serial: impl Into<String>) -> Self {
        self.mfa_devices.push(serial.into());
        self
    }

    #[must_use]
    pub fn with_access_key(mut self, key: AccessKey) -> Self {
        self.access_keys.push(key);
        self
    }

    #[must_use]
    pub fn with_attached_policy(mut self, policy: AttachedPolicy) -> Self {
        self.attached_policies.push(policy);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// A password that has been used at least once means console access.
    pub fn has_console_access(&self) -> bool {
        self.password_last_used.is_some()
    }

    pub fn mfa_enabled(&self) -> bool {
        !self.mfa_devices.is_empty()
    }

    pub fn active_access_keys(&self) -> impl Iterator<Item = &AccessKey> + '_ {
        self.access_keys.iter().filter(|key| key.is_active())
    }

    /// Whole days since the password was last used, `None` without console
    /// access.
    pub fn password_unused_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.password_last_used
            .map(|last_used| (now - last_used).num_days())
    }
}
