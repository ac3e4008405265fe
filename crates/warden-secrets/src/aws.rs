//! AWS Secrets Manager secret store.
//!
//! Uses the official aws-sdk-secretsmanager crate. Writes go through
//! CreateSecret first; when the name is already taken the store falls back
//! to PutSecretValue, which adds a new version to the existing secret.

use async_trait::async_trait;
use aws_sdk_secretsmanager::error::{ProvideErrorMetadata, SdkError};
use tracing::info;

use crate::{SecretError, SecretStore};
use warden_core::ResourceTag;

/// Secret store that writes to AWS Secrets Manager.
#[derive(Debug)]
pub struct AwsSecretStore {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretStore {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        info!(region = ?config.region(), "AWS Secrets Manager store initialized");
        Self {
            client: aws_sdk_secretsmanager::Client::new(config),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn put_secret(
        &self,
        name: &str,
        value: &str,
        tags: &[ResourceTag],
    ) -> Result<String, SecretError> {
        let sm_tags: Vec<_> = tags
            .iter()
            .map(|tag| {
                aws_sdk_secretsmanager::types::Tag::builder()
                    .key(tag.key.clone())
                    .value(tag.value.clone())
                    .build()
            })
            .collect();

        let created = self
            .client
            .create_secret()
            .name(name)
            .secret_string(value)
            .set_tags(Some(sm_tags))
            .send()
            .await;

        match created {
            Ok(_) => {
                info!(secret = %name, "stored new secret");
            }
            Err(err) if is_resource_exists(&err) => {
                self.client
                    .put_secret_value()
                    .secret_id(name)
                    .secret_string(value)
                    .send()
                    .await
                    .map_err(|e| classify_sdk_error("PutSecretValue", name, e))?;
                info!(secret = %name, "updated existing secret");
            }
            Err(err) => return Err(classify_sdk_error("CreateSecret", name, err)),
        }

        Ok(format!("secretsmanager:{name}"))
    }

    fn provider_type(&self) -> &'static str {
        "aws"
    }
}

fn is_resource_exists(
    err: &SdkError<aws_sdk_secretsmanager::operation::create_secret::CreateSecretError>,
) -> bool {
    err.as_service_error()
        .map(|e| e.is_resource_exists_exception())
        .unwrap_or(false)
}

/// Map an SDK failure onto [`SecretError`].
fn classify_sdk_error<E>(operation: &str, name: &str, err: SdkError<E>) -> SecretError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if matches!(&err, SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)) {
        let mut detail = format!("{operation}: {err}");
        let mut cause = std::error::Error::source(&err);
        while let Some(current) = cause {
            detail.push_str(": ");
            detail.push_str(&current.to_string());
            cause = current.source();
        }
        return SecretError::ProviderUnavailable {
            provider: "aws".to_string(),
            detail,
        };
    }

    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    classify_error_code(operation, name, code.as_deref(), message)
}

fn classify_error_code(
    operation: &str,
    name: &str,
    code: Option<&str>,
    message: String,
) -> SecretError {
    match code {
        Some("ThrottlingException" | "Throttling" | "RequestLimitExceeded") => {
            SecretError::Throttled { detail: message }
        }
        Some("AccessDeniedException") => SecretError::PermissionDenied { detail: message },
        Some("InvalidRequestException" | "InvalidParameterException" | "ValidationException") => {
            SecretError::InvalidValue {
                name: name.to_string(),
                detail: message,
            }
        }
        _ => SecretError::ProviderUnavailable {
            provider: "aws".to_string(),
            detail: format!("{operation}: {message}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_codes_are_transient() {
        let err = classify_error_code(
            "CreateSecret",
            "iam-credentials/IT/jdoe",
            Some("ThrottlingException"),
            "Rate exceeded".to_string(),
        );
        assert!(err.is_transient());
    }

    #[test]
    fn test_access_denied_maps_to_permission() {
        let err = classify_error_code(
            "CreateSecret",
            "iam-credentials/IT/jdoe",
            Some("AccessDeniedException"),
            "not authorized".to_string(),
        );
        assert!(matches!(err, SecretError::PermissionDenied { .. }));
    }

    #[test]
    fn test_invalid_request_keeps_secret_name() {
        let err = classify_error_code(
            "CreateSecret",
            "iam-credentials/IT/jdoe",
            Some("InvalidRequestException"),
            "scheduled for deletion".to_string(),
        );
        match err {
            SecretError::InvalidValue { name, detail } => {
                assert_eq!(name, "iam-credentials/IT/jdoe");
                assert!(detail.contains("deletion"));
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_codes_map_to_unavailable() {
        let err = classify_error_code(
            "CreateSecret",
            "iam-credentials/IT/jdoe",
            Some("InternalServiceError"),
            "oops".to_string(),
        );
        assert!(matches!(err, SecretError::ProviderUnavailable { .. }));
        assert!(!err.is_transient());
    }
}
