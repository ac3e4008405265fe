//! CLI error types and exit codes

use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success (including batches that contain failed items)
/// - 1: General error
/// - 2: Usage or validation error
/// - 3: AWS environment or scan error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("AWS configuration error: {0}")]
    AwsConfig(String),

    #[error(transparent)]
    Audit(#[from] warden_audit::AuditError),

    #[error(transparent)]
    Ingest(#[from] warden_provision::IngestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation(_) => 2,
            CliError::AwsConfig(_) | CliError::Audit(_) => 3,
            CliError::Ingest(_) | CliError::Io(_) | CliError::Json(_) => 1,
        }
    }

    /// Print the error to stderr, colored unless NO_COLOR is set.
    pub fn print(&self) {
        if std::env::var("NO_COLOR").is_ok() {
            eprintln!("Error: {self}");
        } else {
            eprintln!("\x1b[31mError:\x1b[0m {self}");
        }
    }
}
