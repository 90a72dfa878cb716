//! Error types for argn-qa-runner

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the pipeline or reading containers
#[derive(Debug, Error)]
pub enum Error {
    /// A pipeline stage exited with a non-zero status; fatal, no retry
    #[error("Pipeline stage failed: {stage} (exit code: {exit_code})")]
    StageFailed {
        /// Stage binary name
        stage: String,
        /// Exit code (negative for signals)
        exit_code: i32,
        /// Stderr output of the stage
        stderr: String,
    },

    /// The pipeline reported success but the artifact is absent
    #[error("Expected output artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    /// File does not start with the ARGN container magic
    #[error("Invalid container magic: {0}")]
    MagicInvalid(PathBuf),

    /// Container format version this reader does not understand
    #[error("Unsupported container version: {major}.{minor}")]
    UnsupportedVersion {
        /// Major version byte
        major: u8,
        /// Minor version byte
        minor: u8,
    },

    /// File ends before the declared attribute header span
    #[error("Container truncated before declared header span")]
    TruncatedHeader,

    /// Attribute header is not a flat map of scalars
    #[error("Container header is not a flat attribute map: {0}")]
    HeaderJson(serde_json::Error),

    /// Serialization error (evidence export, header encoding)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Oracle-side error (record validation, calibration)
    #[error(transparent)]
    Oracle(#[from] argn_qa_oracle::Error),
}
