//! # Warden Provision
//!
//! End-to-end IAM user provisioning: validate the request, create the
//! user, assign groups, attach role policies, generate a console password,
//! escrow the credentials and publish a notification — plus the machinery
//! to do it for a whole CSV of users.
//!
//! # Modules
//!
//! - [`tables`] - static department/group and role/policy assignments
//! - [`password`] - temporary password generation
//! - [`retry`] - the retrying, audited step executor
//! - [`orchestrator`] - the per-request step sequence
//! - [`result`] - per-request results and batch summaries
//! - [`ingest`] - CSV rows to [`warden_core::UserRequest`]
//! - [`batch`] - sequential batch runner
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use warden_connector::{DemoDirectory, DemoNotifier};
//! use warden_core::UserRequest;
//! use warden_provision::Provisioner;
//! use warden_secrets::MemorySecretStore;
//!
//! # async fn run() {
//! let provisioner = Provisioner::new(
//!     Arc::new(DemoDirectory::new()),
//!     Arc::new(MemorySecretStore::new()),
//!     Arc::new(DemoNotifier::new()),
//! );
//!
//! let request = UserRequest {
//!     username: "jdoe".to_string(),
//!     email: "jdoe@example.com".to_string(),
//!     department: "Engineering".to_string(),
//!     role: "Developer".to_string(),
//!     first_name: "Jane".to_string(),
//!     last_name: "Doe".to_string(),
//!     manager: None,
//! };
//!
//! let result = provisioner.provision(&request).await;
//! assert!(result.success);
//! # }
//! ```

pub mod batch;
pub mod ingest;
pub mod orchestrator;
pub mod password;
pub mod result;
pub mod retry;
pub mod tables;

use thiserror::Error;

use warden_connector::ConnectorError;
use warden_secrets::SecretError;

// Re-export main types for convenient access
pub use batch::{BatchOptions, BatchRunner};
pub use ingest::{read_requests, IngestError};
pub use orchestrator::{Provisioner, ProvisionerOptions};
pub use password::{generate_password, DEFAULT_PASSWORD_LENGTH};
pub use result::{BatchSummary, FailedUser, ProvisioningResult};
pub use retry::{run_step, RetryPolicy, Retryable};

/// A step failure, before the orchestrator folds it into a failure
/// [`ProvisioningResult`].
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A directory or notification call failed.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// Credential escrow failed.
    #[error(transparent)]
    Secret(#[from] SecretError),
}
