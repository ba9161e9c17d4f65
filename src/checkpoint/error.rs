//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while capturing or restoring a snapshot
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot data failed validation
    #[error("Snapshot validation failed: {0}")]
    ValidationFailed(String),

    /// The transition table could not be built
    #[error("Transition table could not be built: {0}")]
    Table(#[from] crate::builder::BuildError),
}
