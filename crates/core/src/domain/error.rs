// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid engine state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Invalid duration {input:?}: {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("Invalid probe name {0:?}")]
    InvalidProbeName(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
