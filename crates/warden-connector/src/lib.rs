//! # Warden Connectors
//!
//! Backend implementations for everything warden talks to: the identity
//! source the audit scans, the directory provisioning writes to, and the
//! notification channel.
//!
//! Every seam is a trait with two implementations:
//!
//! - [`demo`] - in-memory backends with a fixed five-user fleet
//! - [`aws`] - IAM and SNS backends built on the official SDK
//!
//! Which one a caller gets is decided once, at construction; the audit and
//! provisioning flows only ever see `Arc<dyn Trait>`.
//!
//! # Example
//!
//! ```
//! use warden_connector::{DemoIdentitySource, IdentitySource};
//!
//! # async fn run() -> warden_connector::ConnectorResult<()> {
//! let source = DemoIdentitySource::new();
//! let identities = source.list_identities().await?;
//! assert_eq!(identities.len(), 5);
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod demo;
pub mod error;
pub mod traits;

// Re-export main types for convenient access
pub use aws::{AwsDirectory, AwsIdentitySource, AwsNotifier};
pub use demo::{demo_fleet, DemoDirectory, DemoIdentitySource, DemoNotifier, PublishedMessage};
pub use error::{ConnectorError, ConnectorResult};
pub use traits::{Directory, IdentitySource, Notifier};
