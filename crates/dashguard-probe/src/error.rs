//! Live probe errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("cloud credentials unavailable: {0}")]
    Credentials(String),

    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },

    #[error("stack not found: {0}")]
    StackNotFound(String),

    #[error("dashboard body error: {0}")]
    Dashboard(#[from] dashguard_core::TemplateError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Message fragments the SDK emits when no usable identity could be resolved.
const CREDENTIAL_MARKERS: [&str; 2] = ["credential", "resolve identity"];

impl ProbeError {
    /// Classifies a failed provider call; identity resolution failures become
    /// [`ProbeError::Credentials`].
    pub fn from_sdk(operation: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if CREDENTIAL_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::Credentials(format!("{operation}: {message}"))
        } else {
            Self::service(operation, message)
        }
    }

    pub fn service(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }
}
