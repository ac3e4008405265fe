//! IAM-backed identity source.

use async_trait::async_trait;
use aws_sdk_iam::types::{StatusType, User};
use tracing::{debug, info};

use super::{classify_sdk_error, to_chrono};
use crate::error::ConnectorResult;
use crate::traits::IdentitySource;
use warden_core::{AccessKey, AccessKeyStatus, AttachedPolicy, IdentityRecord};

/// Identity source that scans IAM users and their credentials.
#[derive(Debug)]
pub struct AwsIdentitySource {
    client: aws_sdk_iam::Client,
}

impl AwsIdentitySource {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        info!(region = ?config.region(), "IAM identity source initialized");
        Self {
            client: aws_sdk_iam::Client::new(config),
        }
    }

    /// Enrich one listed user with MFA devices, access keys, attached
    /// policies and group memberships.
    async fn load_identity(&self, user: &User) -> ConnectorResult<IdentityRecord> {
        let username = user.user_name();
        let mut record = IdentityRecord::new(
            username,
            user.user_id(),
            user.arn(),
            to_chrono(user.create_date()),
        );
        if let Some(last_used) = user.password_last_used() {
            record = record.with_password_last_used(to_chrono(last_used));
        }

        let mfa = self
            .client
            .list_mfa_devices()
            .user_name(username)
            .send()
            .await
            .map_err(|e| classify_sdk_error("ListMFADevices", e))?;
        for device in mfa.mfa_devices() {
            record = record.with_mfa_device(device.serial_number());
        }

        let keys = self
            .client
            .list_access_keys()
            .user_name(username)
            .send()
            .await
            .map_err(|e| classify_sdk_error("ListAccessKeys", e))?;
        for metadata in keys.access_key_metadata() {
            let status = match metadata.status() {
                Some(StatusType::Active) => AccessKeyStatus::Active,
                _ => AccessKeyStatus::Inactive,
            };
            let created = metadata
                .create_date()
                .map(to_chrono)
                .unwrap_or_else(chrono::Utc::now);
            record = record.with_access_key(AccessKey::new(
                metadata.access_key_id().unwrap_or_default(),
                status,
                created,
            ));
        }

        let policies = self
            .client
            .list_attached_user_policies()
            .user_name(username)
            .send()
            .await
            .map_err(|e| classify_sdk_error("ListAttachedUserPolicies", e))?;
        for policy in policies.attached_policies() {
            record = record.with_attached_policy(AttachedPolicy::new(
                policy.policy_name().unwrap_or_default(),
                policy.policy_arn().unwrap_or_default(),
            ));
        }

        let groups = self
            .client
            .list_groups_for_user()
            .user_name(username)
            .send()
            .await
            .map_err(|e| classify_sdk_error("ListGroupsForUser", e))?;
        for group in groups.groups() {
            record = record.with_group(group.group_name());
        }

        debug!(username = %username, "collected identity");
        Ok(record)
    }
}

#[async_trait]
impl IdentitySource for AwsIdentitySource {
    fn provider_type(&self) -> &'static str {
        "aws"
    }

    async fn list_identities(&self) -> ConnectorResult<Vec<IdentityRecord>> {
        let mut identities = Vec::new();

        let mut pages = self.client.list_users().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify_sdk_error("ListUsers", e))?;
            for user in page.users() {
                identities.push(self.load_identity(user).await?);
            }
        }

        info!(users = identities.len(), "collected IAM identities");
        Ok(identities)
    }
}
