//! Error types for argn-qa-oracle

use thiserror::Error;

/// Result type alias for oracle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading records or evaluating a comparison
#[derive(Debug, Error)]
pub enum Error {
    /// Attribute key set does not match the canonical ARGN key set
    #[error("{0}")]
    KeySet(#[from] crate::keyset::KeySetMismatch),

    /// Attribute present but carrying the wrong scalar type
    #[error("Attribute {field} has wrong type: expected {expected}, got {got}")]
    SchemaViolation {
        /// Field name
        field: &'static str,
        /// Expected scalar type
        expected: &'static str,
        /// Observed scalar type
        got: &'static str,
    },

    /// Attribute missing from the record
    #[error("Attribute missing: {0}")]
    MissingAttr(&'static str),

    /// No calibrated envelope available for a non-deterministic field
    #[error("No calibrated envelope for field: {0}")]
    MissingEnvelope(&'static str),

    /// Calibration file could not be read
    #[error("Calibration IO error: {0}")]
    CalibrationIo(#[from] std::io::Error),

    /// Calibration file could not be parsed
    #[error("Calibration parse error: {0}")]
    CalibrationParse(#[from] serde_yaml::Error),
}
