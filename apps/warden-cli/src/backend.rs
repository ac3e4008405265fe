//! Demo/live backend assembly.
//!
//! Every command picks its collaborators here: bundled in-memory demo
//! backends by default, real AWS clients with `--live`. Live mode
//! resolves region and credentials up front so a misconfigured
//! environment fails before any work starts.

use std::sync::Arc;

use aws_credential_types::provider::ProvideCredentials;
use tracing::info;

use crate::error::{CliError, CliResult};
use warden_connector::{
    AwsDirectory, AwsIdentitySource, AwsNotifier, DemoDirectory, DemoIdentitySource, DemoNotifier,
    Directory, IdentitySource, Notifier,
};
use warden_secrets::{AwsSecretStore, MemorySecretStore, SecretStore};

/// Load the shared AWS configuration, failing fast when the environment
/// is unusable.
async fn load_aws_config() -> CliResult<aws_config::SdkConfig> {
    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

    if config.region().is_none() {
        return Err(CliError::AwsConfig(
            "no region configured; set AWS_REGION or a profile region".to_string(),
        ));
    }

    let provider = config
        .credentials_provider()
        .ok_or_else(|| CliError::AwsConfig("no credentials provider configured".to_string()))?;
    provider
        .provide_credentials()
        .await
        .map_err(|e| CliError::AwsConfig(format!("cannot resolve credentials: {e}")))?;

    info!(region = ?config.region(), "AWS environment validated");
    Ok(config)
}

/// Identity source for the audit command.
pub async fn identity_source(live: bool) -> CliResult<Arc<dyn IdentitySource>> {
    if live {
        let config = load_aws_config().await?;
        Ok(Arc::new(AwsIdentitySource::new(&config)))
    } else {
        Ok(Arc::new(DemoIdentitySource::new()))
    }
}

/// The three collaborators the provisioning pipeline needs.
pub struct ProvisioningBackend {
    pub directory: Arc<dyn Directory>,
    pub secrets: Arc<dyn SecretStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ProvisioningBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningBackend")
            .field("directory", &self.directory.provider_type())
            .field("secrets", &self.secrets.provider_type())
            .field("notifier", &self.notifier.provider_type())
            .finish()
    }
}

/// Backends for the provision commands.
///
/// A topic ARN is only required in live mode; the demo notifier records
/// events instead of publishing them.
pub async fn provisioning_backend(
    live: bool,
    topic_arn: Option<&str>,
) -> CliResult<ProvisioningBackend> {
    if live {
        let topic_arn = topic_arn.ok_or_else(|| {
            CliError::Validation(
                "--topic-arn (or WARDEN_SNS_TOPIC_ARN) is required in live mode".to_string(),
            )
        })?;
        let config = load_aws_config().await?;
        Ok(ProvisioningBackend {
            directory: Arc::new(AwsDirectory::new(&config)),
            secrets: Arc::new(AwsSecretStore::new(&config)),
            notifier: Arc::new(AwsNotifier::new(&config, topic_arn)),
        })
    } else {
        Ok(ProvisioningBackend {
            directory: Arc::new(DemoDirectory::new()),
            secrets: Arc::new(MemorySecretStore::new()),
            notifier: Arc::new(DemoNotifier::new()),
        })
    }
}
