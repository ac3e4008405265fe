//! IAM-backed user directory.

use async_trait::async_trait;
use tracing::info;

use super::classify_sdk_error;
use crate::error::{ConnectorError, ConnectorResult};
use crate::traits::Directory;
use warden_core::ResourceTag;

/// Directory that provisions users into IAM.
#[derive(Debug)]
pub struct AwsDirectory {
    client: aws_sdk_iam::Client,
}

impl AwsDirectory {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        info!(region = ?config.region(), "IAM directory initialized");
        Self {
            client: aws_sdk_iam::Client::new(config),
        }
    }
}

fn to_iam_tags(tags: &[ResourceTag]) -> ConnectorResult<Vec<aws_sdk_iam::types::Tag>> {
    tags.iter()
        .map(|tag| {
            aws_sdk_iam::types::Tag::builder()
                .key(tag.key.clone())
                .value(tag.value.clone())
                .build()
                .map_err(|e| ConnectorError::parameter_validation(e.to_string()))
        })
        .collect()
}

#[async_trait]
impl Directory for AwsDirectory {
    fn provider_type(&self) -> &'static str {
        "aws"
    }

    async fn create_user(&self, username: &str, tags: &[ResourceTag]) -> ConnectorResult<()> {
        let iam_tags = to_iam_tags(tags)?;
        self.client
            .create_user()
            .user_name(username)
            .set_tags(Some(iam_tags))
            .send()
            .await
            .map_err(|e| classify_sdk_error("CreateUser", e))?;
        info!(username = %username, "created user");
        Ok(())
    }

    async fn add_user_to_group(&self, username: &str, group: &str) -> ConnectorResult<()> {
        self.client
            .add_user_to_group()
            .group_name(group)
            .user_name(username)
            .send()
            .await
            .map_err(|e| classify_sdk_error("AddUserToGroup", e))?;
        info!(username = %username, group = %group, "added user to group");
        Ok(())
    }

    async fn attach_user_policy(&self, username: &str, policy_arn: &str) -> ConnectorResult<()> {
        self.client
            .attach_user_policy()
            .user_name(username)
            .policy_arn(policy_arn)
            .send()
            .await
            .map_err(|e| classify_sdk_error("AttachUserPolicy", e))?;
        info!(username = %username, policy = %policy_arn, "attached policy");
        Ok(())
    }

    async fn create_login_profile(
        &self,
        username: &str,
        password: &str,
        reset_required: bool,
    ) -> ConnectorResult<()> {
        self.client
            .create_login_profile()
            .user_name(username)
            .password(password)
            .password_reset_required(reset_required)
            .send()
            .await
            .map_err(|e| classify_sdk_error("CreateLoginProfile", e))?;
        info!(username = %username, reset_required, "created login profile");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_conversion_preserves_pairs() {
        let tags = vec![
            ResourceTag::new("Department", "Engineering"),
            ResourceTag::new("CreatedBy", "IAM-Automation"),
        ];
        let iam_tags = to_iam_tags(&tags).unwrap();
        assert_eq!(iam_tags.len(), 2);
        assert_eq!(iam_tags[0].key(), "Department");
        assert_eq!(iam_tags[0].value(), "Engineering");
        assert_eq!(iam_tags[1].key(), "CreatedBy");
    }
}
