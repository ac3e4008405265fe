//! Pluggable secret escrow for provisioned credentials.
//!
//! This crate provides a `SecretStore` trait that abstracts writing
//! credential payloads to a backend: an in-memory store for demo mode and
//! tests, and AWS Secrets Manager for live runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use warden_secrets::{MemorySecretStore, SecretStore};
//!
//! let store = MemorySecretStore::new();
//! let locator = store
//!     .put_secret("iam-credentials/Engineering/jdoe", payload, &tags)
//!     .await?;
//! ```

pub mod aws;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warden_core::ResourceTag;

// Re-exports
pub use aws::AwsSecretStore;
pub use memory::MemorySecretStore;

// ── SecretError ──────────────────────────────────────────────────────────

/// Errors returned by secret store operations.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// Store is unreachable (network error, endpoint misconfiguration).
    #[error("Secret store '{provider}' unavailable: {detail}")]
    ProviderUnavailable { provider: String, detail: String },

    /// The store asked us to slow down.
    #[error("Secret write throttled: {detail}")]
    Throttled { detail: String },

    /// The store rejected the payload for `name`.
    #[error("Invalid secret value for '{name}': {detail}")]
    InvalidValue { name: String, detail: String },

    /// Configuration error (missing required config).
    #[error("Secret store configuration error: {detail}")]
    ConfigError { detail: String },

    /// Permission denied (IAM policy).
    #[error("Permission denied: {detail}")]
    PermissionDenied { detail: String },
}

impl SecretError {
    /// Check if retrying the write may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, SecretError::Throttled { .. })
    }
}

// ── StoredSecret ─────────────────────────────────────────────────────────

/// A secret as recorded by the in-memory store.
#[derive(Clone)]
pub struct StoredSecret {
    pub name: String,
    /// Raw payload. Never logged; the Debug impl redacts it.
    pub value: String,
    pub tags: Vec<ResourceTag>,
    /// How many values this secret has held, starting at 1.
    pub versions: u32,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for StoredSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSecret")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("tags", &self.tags)
            .field("versions", &self.versions)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

// ── SecretStore Trait ─────────────────────────────────────────────────────

/// Trait that all secret stores must implement.
///
/// Stores persist credential payloads under a caller-chosen name and hand
/// back an opaque locator (`secretsmanager:{name}`) that is safe to put in
/// results and notifications.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Persist `value` under `name`, creating the secret or updating the
    /// existing one in place.
    ///
    /// Tags apply on creation only; updates keep the original tags.
    async fn put_secret(
        &self,
        name: &str,
        value: &str,
        tags: &[ResourceTag],
    ) -> Result<String, SecretError>;

    /// Return the store type name for logging/diagnostics.
    fn provider_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_throttling_is_transient() {
        assert!(SecretError::Throttled {
            detail: "Rate exceeded".to_string()
        }
        .is_transient());

        assert!(!SecretError::ProviderUnavailable {
            provider: "aws".to_string(),
            detail: "connection refused".to_string()
        }
        .is_transient());

        assert!(!SecretError::PermissionDenied {
            detail: "denied by IAM policy".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_secret_error_display() {
        let err = SecretError::ProviderUnavailable {
            provider: "aws".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Secret store 'aws' unavailable: connection refused"
        );

        let err = SecretError::Throttled {
            detail: "Rate exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Secret write throttled: Rate exceeded");
    }

    #[test]
    fn test_stored_secret_debug_redacts_value() {
        let secret = StoredSecret {
            name: "iam-credentials/Engineering/jdoe".to_string(),
            value: "super-secret".to_string(),
            tags: Vec::new(),
            versions: 1,
            updated_at: Utc::now(),
        };
        let rendered = format!("{secret:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
    }
}
