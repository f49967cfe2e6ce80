//! Error types for quest packets.

use std::path::PathBuf;

use thiserror::Error;

use crate::host::HostCallKind;

/// Result type alias for quest packet operations.
pub type Result<T> = std::result::Result<T, QuestError>;

/// Main error type for quest packets.
#[derive(Debug, Error)]
pub enum QuestError {
    /// The host refused a boundary call. Aborts the current entry point.
    #[error("Host rejected {call}: {reason}")]
    HostRejected { call: HostCallKind, reason: String },

    #[error("Invalid quest content: {0}")]
    InvalidContent(String),

    #[error("Failed to parse quest content: {0}")]
    ContentParse(#[from] serde_json::Error),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuestError {
    /// Creates a host rejection error for the given call.
    pub fn rejected(call: HostCallKind, reason: impl Into<String>) -> Self {
        QuestError::HostRejected {
            call,
            reason: reason.into(),
        }
    }
}
