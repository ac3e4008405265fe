//! Provisioning request model and its validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// A request rejected before any backend was touched.
#[derive(Debug, Clone, Error)]
#[error("{reasons}")]
pub struct InvalidRequest {
    reasons: String,
}

impl InvalidRequest {
    pub fn reasons(&self) -> &str {
        &self.reasons
    }
}

impl From<ValidationErrors> for InvalidRequest {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors.field_errors();
        let mut names: Vec<_> = fields.keys().copied().collect();
        names.sort_unstable();

        let mut reasons = Vec::new();
        for name in names {
            for error in fields[name] {
                match &error.message {
                    Some(message) => reasons.push(message.clone().into_owned()),
                    None => reasons.push(format!("{name} is invalid")),
                }
            }
        }
        Self {
            reasons: reasons.join("; "),
        }
    }
}

/// Everything needed to provision one user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3-64 characters"))]
    pub username: String,
    #[validate(contains(pattern = "@", message = "email must contain '@'"))]
    pub email: String,
    #[validate(length(min = 1, message = "department is required"))]
    pub department: String,
    #[validate(length(min = 1, message = "role is required"))]
    pub role: String,
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    pub manager: Option<String>,
}

impl UserRequest {
    /// Run field validation, flattening the per-field errors into one
    /// operator-readable reason string.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        Validate::validate(self).map_err(InvalidRequest::from)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Tags applied to every resource created for this request.
    pub fn resource_tags(&self, created_on: DateTime<Utc>) -> Vec<ResourceTag> {
        let mut tags = vec![
            ResourceTag::new("Department", self.department.clone()),
            ResourceTag::new("Role", self.role.clone()),
            ResourceTag::new("Email", self.email.clone()),
            ResourceTag::new("DisplayName", self.display_name()),
            ResourceTag::new("CreatedBy", "IAM-Automation"),
            ResourceTag::new("CreatedDate", created_on.format("%Y-%m-%d").to_string()),
        ];
        if let Some(manager) = &self.manager {
            if !manager.is_empty() {
                tags.push(ResourceTag::new("Manager", manager.clone()));
            }
        }
        tags
    }
}

/// Key/value tag applied to provisioned resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

impl ResourceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
