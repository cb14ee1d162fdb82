//! Error types and exit codes for runlens
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (missing report, invalid report structure)
//! - 4: Release gate failed

mod macros;

use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing or structurally invalid report (3)
    Data = 3,
    /// Release gate did not pass (4)
    Gate = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during runlens operations
#[derive(Error, Debug)]
pub enum RunlensError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("invalid report structure at {path}: {reason}")]
    InvalidReport { path: String, reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Gate (exit code 4)
    #[error("release gate {gate}")]
    GateFailed { gate: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperation {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl RunlensError {
    /// Create an error for a structurally invalid report node
    pub fn invalid_report(path: impl Into<String>, reason: impl Into<String>) -> Self {
        RunlensError::InvalidReport {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        RunlensError::FailedOperation {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        RunlensError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        RunlensError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunlensError::UsageError(_) | RunlensError::InvalidValue { .. } => ExitCode::Usage,

            RunlensError::InvalidReport { .. } | RunlensError::NotFound { .. } => ExitCode::Data,

            RunlensError::GateFailed { .. } => ExitCode::Gate,

            RunlensError::Io(_)
            | RunlensError::Json(_)
            | RunlensError::Toml(_)
            | RunlensError::FailedOperation { .. }
            | RunlensError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            RunlensError::UsageError(_) => "usage_error",
            RunlensError::InvalidValue { .. } => "invalid_value",
            RunlensError::InvalidReport { .. } => "invalid_report",
            RunlensError::NotFound { .. } => "not_found",
            RunlensError::GateFailed { .. } => "gate_failed",
            RunlensError::Io(_) => "io_error",
            RunlensError::Json(_) => "json_error",
            RunlensError::Toml(_) => "toml_error",
            RunlensError::FailedOperation { .. } => "failed_operation",
            RunlensError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let RunlensError::InvalidReport { path, .. } = self {
            error_obj["path"] = serde_json::json!(path);
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for runlens operations
pub type Result<T> = std::result::Result<T, RunlensError>;
