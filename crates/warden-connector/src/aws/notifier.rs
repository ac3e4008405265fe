//! SNS-backed notifier.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::classify_sdk_error;
use crate::error::{ConnectorError, ConnectorResult};
use crate::traits::Notifier;

/// Notifier that publishes provisioning events to an SNS topic.
#[derive(Debug)]
pub struct AwsNotifier {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl AwsNotifier {
    pub fn new(config: &aws_config::SdkConfig, topic_arn: impl Into<String>) -> Self {
        let topic_arn = topic_arn.into();
        info!(topic = %topic_arn, "SNS notifier initialized");
        Self {
            client: aws_sdk_sns::Client::new(config),
            topic_arn,
        }
    }
}

#[async_trait]
impl Notifier for AwsNotifier {
    fn provider_type(&self) -> &'static str {
        "aws"
    }

    async fn publish(&self, subject: &str, message: &Value) -> ConnectorResult<()> {
        let body = serde_json::to_string_pretty(message)
            .map_err(|e| ConnectorError::unexpected(format!("serializing notification: {e}")))?;

        self.client
            .publish()
            .topic_arn(self.topic_arn.as_str())
            .subject(subject)
            .message(body)
            .send()
            .await
            .map_err(|e| classify_sdk_error("Publish", e))?;

        info!(subject = %subject, topic = %self.topic_arn, "published notification");
        Ok(())
    }
}
