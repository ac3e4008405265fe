//! AWS-backed providers.
//!
//! One client per seam, all built from a shared [`aws_config::SdkConfig`].
//! SDK errors funnel through [`classify_sdk_error`] so every provider
//! reports the same [`ConnectorError`] taxonomy.

mod directory;
mod identity;
mod notifier;

pub use directory::AwsDirectory;
pub use identity::AwsIdentitySource;
pub use notifier::AwsNotifier;

use aws_sdk_iam::error::{ProvideErrorMetadata, SdkError};
use chrono::{DateTime, Utc};

use crate::error::ConnectorError;

/// Map an SDK failure onto the connector taxonomy.
///
/// Timeouts and dispatch failures become `ConnectionFailed`; service errors
/// are classified by their AWS error code; anything else lands in
/// `Unexpected` with the original error kept as source.
pub(crate) fn classify_sdk_error<E>(operation: &str, err: SdkError<E>) -> ConnectorError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if matches!(&err, SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)) {
        let mut message = format!("{operation}: {err}");
        let mut cause = std::error::Error::source(&err);
        while let Some(current) = cause {
            message.push_str(": ");
            message.push_str(&current.to_string());
            cause = current.source();
        }
        return ConnectorError::connection_failed_with_source(message, err);
    }

    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());

    match classify_error_code(code.as_deref(), message) {
        Ok(classified) => classified,
        Err(message) => {
            ConnectorError::unexpected_with_source(format!("{operation}: {message}"), err)
        }
    }
}

/// Code-based classification, split out so it can be tested without
/// constructing SDK errors. Returns the unclaimed message on no match.
fn classify_error_code(code: Option<&str>, message: String) -> Result<ConnectorError, String> {
    match code {
        Some("Throttling" | "ThrottlingException" | "RequestLimitExceeded") => {
            Ok(ConnectorError::throttled(message))
        }
        Some("EntityAlreadyExists" | "ResourceExistsException") => {
            Ok(ConnectorError::already_exists(message))
        }
        Some("NoSuchEntity" | "ResourceNotFoundException") => {
            Ok(ConnectorError::not_found(message))
        }
        Some("LimitExceeded" | "LimitExceededException") => {
            Ok(ConnectorError::limit_exceeded(message))
        }
        Some("MalformedPolicyDocument") => Ok(ConnectorError::malformed_document(message)),
        Some("InvalidInput" | "ValidationError" | "ValidationException") => {
            Ok(ConnectorError::invalid_input(message))
        }
        _ => Err(message),
    }
}

/// Convert an SDK timestamp to chrono.
pub(crate) fn to_chrono(value: &aws_sdk_iam::primitives::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
