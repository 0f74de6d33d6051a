// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: `--{field}` {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt metadata for probe {name:?}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Spawn error: {0}")]
    Spawn(String),

    #[error("Persist error: worker for {name:?} is running as PID {pid} but is unregistered: {reason}")]
    Persist {
        name: String,
        pid: i32,
        reason: String,
    },

    #[error("Liveness probe failed for PID {pid}: {reason}")]
    Probe { pid: i32, reason: String },

    #[error("Cannot signal PID {pid}: {reason}")]
    Signal { pid: i32, reason: String },

    #[error("Script error: {0}")]
    Script(String),

    #[error("Notifier error: {0}")]
    Notifier(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Process exit code for a command that failed with this error.
    ///
    /// Bad input exits with 2, every other failure with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation { .. } => 2,
            _ => 1,
        }
    }

    /// True when the error means the probe (or its process) simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::validation("probe", "is required").exit_code(), 2);
        assert_eq!(AppError::Spawn("boom".into()).exit_code(), 1);
        assert_eq!(
            AppError::Persist {
                name: "focus".into(),
                pid: 42,
                reason: "disk full".into()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = AppError::validation("script", "is required");
        assert_eq!(err.to_string(), "Validation error: `--script` is required");
    }
}
