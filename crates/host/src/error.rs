//! Packet host error types.

use std::path::PathBuf;

use questpack_core::QuestError;
use thiserror::Error;

/// Error type for loading and driving packets.
#[derive(Debug, Error)]
pub enum PacketError {
    /// Failed to load packet file.
    #[error("Failed to load packet from {path}: {reason}")]
    LoadError { path: PathBuf, reason: String },

    /// Packet file not found.
    #[error("Packet not found: {0}")]
    NotFound(PathBuf),

    /// Not a WASM component.
    #[error("Invalid packet format: {0}")]
    InvalidFormat(String),

    /// Manifest parsing error.
    #[error("Failed to parse packet manifest: {0}")]
    ManifestError(String),

    /// WASM runtime error, including traps raised by the packet.
    #[error("WASM runtime error: {0}")]
    WasmError(String),

    /// `on-visit` was called before `init`.
    #[error("Packet '{0}' has not been initialized")]
    NotInitialized(String),

    /// `init` was called a second time.
    #[error("Packet '{0}' is already initialized")]
    AlreadyInitialized(String),

    /// The instance trapped earlier and can no longer be entered.
    #[error("Packet '{0}' faulted and must be reloaded")]
    Faulted(String),

    /// Quest content error.
    #[error(transparent)]
    Content(#[from] QuestError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<wasmtime::Error> for PacketError {
    fn from(err: wasmtime::Error) -> Self {
        PacketError::WasmError(format!("{:#}", err))
    }
}

/// Result type for packet host operations.
pub type Result<T> = std::result::Result<T, PacketError>;
