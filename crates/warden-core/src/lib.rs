//! Warden Core Library
//!
//! Shared domain types for the warden audit and provisioning crates.
//!
//! # Modules
//!
//! - [`identity`] - Point-in-time IAM user snapshots ([`IdentityRecord`])
//! - [`finding`] - Compliance findings ([`Finding`], [`Severity`])
//! - [`request`] - Provisioning requests and their validation ([`UserRequest`])
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use warden_core::{IdentityRecord, UserRequest};
//!
//! let identity = IdentityRecord::new(
//!     "jdoe",
//!     "AIDAEXAMPLE0000000001",
//!     "arn:aws:iam::123456789012:user/jdoe",
//!     Utc::now(),
//! );
//! assert!(!identity.has_console_access());
//! ```

pub mod finding;
pub mod identity;
pub mod request;

// Re-export main types for convenient access
pub use finding::{ComplianceStatus, Finding, Severity};
pub use identity::{AccessKey, AccessKeyStatus, AttachedPolicy, IdentityRecord};
pub use request::{InvalidRequest, ResourceTag, UserRequest};
