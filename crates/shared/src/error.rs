use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a submission is attempted without a selected file.
pub const NO_FILE_SELECTED: &str = "no file selected";
/// Fallback when a failure carries no usable detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unknown error occurred";
pub const TIMEOUT_MESSAGE: &str = "Request to the analysis service timed out";
pub const MALFORMED_RESPONSE_MESSAGE: &str = "Analysis service returned a malformed response";
pub const ABANDONED_MESSAGE: &str = "Analysis request was abandoned before it completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSource {
    /// Caught locally before any I/O.
    Validation,
    /// The request could not complete: network failure, timeout, malformed response.
    Transport,
    /// The service answered with a non-success status.
    Service,
}

impl ErrorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSource::Validation => "validation",
            ErrorSource::Transport => "transport",
            ErrorSource::Service => "service",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct SessionError {
    pub kind: ErrorSource,
    pub message: String,
}

impl SessionError {
    pub fn new(kind: ErrorSource, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn no_file_selected() -> Self {
        Self::new(ErrorSource::Validation, NO_FILE_SELECTED)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorSource::Transport, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorSource::Service, message)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
