//! Error types for quay.
//!
//! Per-keystroke and per-submission failures never surface here; they are
//! reported to a message sink. `QuayError` covers startup work (registration,
//! bulk loading, configuration) where the host is expected to abort.

use std::io;

use crate::status::{Failure, ResultStatus};

/// Errors produced while composing a console.
#[derive(Debug, thiserror::Error)]
pub enum QuayError {
    #[error("{0}")]
    Status(#[from] Failure),

    #[error("registration error: {0}")]
    Registration(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("content error: {0}")]
    Content(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuayError {
    /// Status code that best describes this error.
    pub fn status(&self) -> ResultStatus {
        match self {
            QuayError::Status(f) => f.status(),
            QuayError::Registration(_) => ResultStatus::AlreadyExists,
            QuayError::Io(e) if e.kind() == io::ErrorKind::NotFound => {
                ResultStatus::PathDoesNotExist
            },
            QuayError::Config(_) | QuayError::TomlParse(_) | QuayError::Json(_) => {
                ResultStatus::InvalidArgument
            },
            _ => ResultStatus::Failed,
        }
    }
}

impl From<ResultStatus> for QuayError {
    fn from(status: ResultStatus) -> Self {
        QuayError::Status(Failure::new(status))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, QuayError>;
