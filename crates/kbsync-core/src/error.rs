//! Error types and exit codes for kbsync
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (remote errors, failed passes, IO)
//! - 2: Usage error (bad flags/args, invalid configuration values)
//! - 3: Data/vault error (missing vault, missing settings, incomplete configuration)

/// Return early with an [`KbsyncError::InvalidValue`]
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::KbsyncError::invalid_value($context, $value))
    };
}

use std::path::PathBuf;

use thiserror::Error;

use crate::remote::RemoteError;

/// Exit codes for the kbsync CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/vault error - missing vault or settings (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during kbsync operations
#[derive(Error, Debug)]
pub enum KbsyncError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data/vault errors (exit code 3)
    #[error("vault not found: {path:?}")]
    VaultNotFound { path: PathBuf },

    #[error("settings not found at {path:?} (run `kbsync init` first)")]
    SettingsNotFound { path: PathBuf },

    #[error("{setting} not configured")]
    MissingSetting { setting: &'static str },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("a sync pass is already running for this vault")]
    PassInProgress,

    #[error("sync interrupted")]
    Interrupted,

    #[error("sync failed at {path}: {source}")]
    PassFailed {
        path: String,
        synced: usize,
        skipped: usize,
        #[source]
        source: Box<KbsyncError>,
    },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl KbsyncError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        KbsyncError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        KbsyncError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        KbsyncError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Wrap a per-document failure into the pass-level error
    pub fn pass_failed(path: &str, synced: usize, skipped: usize, source: KbsyncError) -> Self {
        KbsyncError::PassFailed {
            path: path.to_string(),
            synced,
            skipped,
            source: Box::new(source),
        }
    }

    /// True for errors raised before a pass touched the vault or the network
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            KbsyncError::MissingSetting { .. }
                | KbsyncError::InvalidValue { .. }
                | KbsyncError::SettingsNotFound { .. }
        )
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            KbsyncError::UsageError(_)
            | KbsyncError::InvalidValue { .. }
            | KbsyncError::Unsupported { .. } => ExitCode::Usage,

            KbsyncError::VaultNotFound { .. }
            | KbsyncError::SettingsNotFound { .. }
            | KbsyncError::MissingSetting { .. } => ExitCode::Data,

            KbsyncError::Io(_)
            | KbsyncError::Json(_)
            | KbsyncError::Toml(_)
            | KbsyncError::Remote(_)
            | KbsyncError::PassInProgress
            | KbsyncError::Interrupted
            | KbsyncError::PassFailed { .. }
            | KbsyncError::FailedOperationWithTarget { .. }
            | KbsyncError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            KbsyncError::UsageError(_) => "usage_error",
            KbsyncError::InvalidValue { .. } => "invalid_value",
            KbsyncError::Unsupported { .. } => "unsupported",
            KbsyncError::VaultNotFound { .. } => "vault_not_found",
            KbsyncError::SettingsNotFound { .. } => "settings_not_found",
            KbsyncError::MissingSetting { .. } => "missing_setting",
            KbsyncError::Io(_) => "io_error",
            KbsyncError::Json(_) => "json_error",
            KbsyncError::Toml(_) => "toml_error",
            KbsyncError::Remote(_) => "remote_error",
            KbsyncError::PassInProgress => "pass_in_progress",
            KbsyncError::Interrupted => "interrupted",
            KbsyncError::PassFailed { .. } => "pass_failed",
            KbsyncError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            KbsyncError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let KbsyncError::PassFailed {
            path,
            synced,
            skipped,
            source,
        } = self
        {
            error_obj["path"] = serde_json::json!(path);
            error_obj["synced"] = serde_json::json!(synced);
            error_obj["skipped"] = serde_json::json!(skipped);
            error_obj["cause"] = serde_json::json!({
                "type": source.error_type(),
                "message": source.to_string(),
            });
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for kbsync operations
pub type Result<T> = std::result::Result<T, KbsyncError>;
