//! Connector error types
//!
//! Error definitions with transient/permanent classification for retry logic.

use thiserror::Error;

/// Error that can occur while talking to a backend.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Connection errors (permanent)
    /// Failed to reach the target system.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Rate limiting (transient)
    /// The target system asked us to slow down.
    #[error("request throttled: {message}")]
    Throttled { message: String },

    // Target-state errors (permanent)
    /// Create conflict: the resource is already there.
    #[error("already exists: {identifier}")]
    AlreadyExists { identifier: String },

    /// A referenced resource does not exist in the target system.
    #[error("not found: {identifier}")]
    NotFound { identifier: String },

    /// An account-level quota was hit.
    #[error("limit exceeded: {message}")]
    LimitExceeded { message: String },

    /// A policy document was rejected by the target system.
    #[error("malformed policy document: {message}")]
    MalformedDocument { message: String },

    /// The target system rejected a request value.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A request failed client-side validation before it was sent.
    #[error("parameter validation failed: {message}")]
    ParameterValidation { message: String },

    /// Anything the taxonomy does not classify.
    #[error("unexpected error: {message}")]
    Unexpected {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConnectorError {
    /// Check if this error is transient and the operation should be retried.
    ///
    /// Only throttling qualifies. Everything else either reflects target
    /// state (retrying cannot change it) or a configuration problem that
    /// needs a human.
    pub fn is_transient(&self) -> bool {
        matches!(self, ConnectorError::Throttled { .. })
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ConnectorError::Throttled { .. } => "THROTTLED",
            ConnectorError::AlreadyExists { .. } => "ALREADY_EXISTS",
            ConnectorError::NotFound { .. } => "NOT_FOUND",
            ConnectorError::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            ConnectorError::MalformedDocument { .. } => "MALFORMED_DOCUMENT",
            ConnectorError::InvalidInput { .. } => "INVALID_INPUT",
            ConnectorError::ParameterValidation { .. } => "PARAMETER_VALIDATION",
            ConnectorError::Unexpected { .. } => "UNEXPECTED",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a throttled error.
    pub fn throttled(message: impl Into<String>) -> Self {
        ConnectorError::Throttled {
            message: message.into(),
        }
    }

    /// Create an already-exists error.
    pub fn already_exists(identifier: impl Into<String>) -> Self {
        ConnectorError::AlreadyExists {
            identifier: identifier.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(identifier: impl Into<String>) -> Self {
        ConnectorError::NotFound {
            identifier: identifier.into(),
        }
    }

    /// Create a limit exceeded error.
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        ConnectorError::LimitExceeded {
            message: message.into(),
        }
    }

    /// Create a malformed document error.
    pub fn malformed_document(message: impl Into<String>) -> Self {
        ConnectorError::MalformedDocument {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ConnectorError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a parameter validation error.
    pub fn parameter_validation(message: impl Into<String>) -> Self {
        ConnectorError::ParameterValidation {
            message: message.into(),
        }
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        ConnectorError::Unexpected {
            message: message.into(),
            source: None,
        }
    }

    /// Create an unexpected error with source.
    pub fn unexpected_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::Unexpected {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_throttling_is_transient() {
        let err = ConnectorError::throttled("Rate exceeded");
        assert!(err.is_transient());
        assert!(!err.is_permanent());
    }

    #[test]
    fn test_permanent_errors() {
        let permanent_errors = vec![
            ConnectorError::connection_failed("dns lookup failed"),
            ConnectorError::already_exists("jdoe"),
            ConnectorError::not_found("Engineering-Users"),
            ConnectorError::limit_exceeded("user quota reached"),
            ConnectorError::malformed_document("bad json"),
            ConnectorError::invalid_input("bad username"),
            ConnectorError::parameter_validation("missing field"),
            ConnectorError::unexpected("boom"),
        ];

        for err in permanent_errors {
            assert!(
                err.is_permanent(),
                "Expected {} to be permanent",
                err.error_code()
            );
            assert!(
                !err.is_transient(),
                "Expected {} to not be transient",
                err.error_code()
            );
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ConnectorError::throttled("x").error_code(), "THROTTLED");
        assert_eq!(
            ConnectorError::connection_failed("x").error_code(),
            "CONNECTION_FAILED"
        );
        assert_eq!(
            ConnectorError::already_exists("x").error_code(),
            "ALREADY_EXISTS"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ConnectorError::already_exists("jdoe");
        assert_eq!(err.to_string(), "already exists: jdoe");

        let err = ConnectorError::not_found("Ghost-Group");
        assert_eq!(err.to_string(), "not found: Ghost-Group");
    }

    #[test]
    fn test_error_with_source() {
        let source_err = std::io::Error::new(std::io::ErrorKind::Other, "underlying error");
        let err = ConnectorError::connection_failed_with_source("failed", source_err);

        assert!(err.is_permanent());
        if let ConnectorError::ConnectionFailed { source, .. } = &err {
            assert!(source.is_some());
        } else {
            panic!("Expected ConnectionFailed variant");
        }
    }
}
