//! Field comparison policies and per-field diagnostics
//!
//! Deterministic fields compare by strict value equality. Non-deterministic
//! fields compare either pairwise with a relative tolerance or against a
//! calibrated envelope. Every failed check emits one [`Diagnostic`] and the
//! pass continues with the remaining fields.

use crate::calibration::Envelope;
use crate::keyset::KeySetMismatch;
use crate::record::AttrValue;
use serde::Serialize;
use std::fmt;

/// One human-readable divergence found during a comparison pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Attribute key set deviates from the canonical schema
    KeySet(KeySetMismatch),
    /// Deterministic field differs between the two records
    ValueMismatch {
        /// Field name
        field: &'static str,
        /// Value in the candidate record
        candidate: AttrValue,
        /// Value in the reference record, or the expected literal
        reference: AttrValue,
    },
    /// Non-deterministic field differs by more than the relative tolerance
    ToleranceExceeded {
        /// Field name
        field: &'static str,
        /// Value in the candidate record
        candidate: f64,
        /// Value in the reference record
        reference: f64,
        /// Relative tolerance that was violated
        rtol: f64,
    },
    /// Non-deterministic field falls outside its calibrated envelope
    EnvelopeExceeded {
        /// Field name
        field: &'static str,
        /// Observed value
        observed: f64,
        /// Exclusive lower bound
        lower: f64,
        /// Exclusive upper bound
        upper: f64,
    },
}

impl Diagnostic {
    /// Field the diagnostic refers to, if it is field-scoped
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::KeySet(_) => None,
            Self::ValueMismatch { field, .. }
            | Self::ToleranceExceeded { field, .. }
            | Self::EnvelopeExceeded { field, .. } => Some(field),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeySet(mismatch) => mismatch.fmt(f),
            Self::ValueMismatch {
                field,
                candidate,
                reference,
            } => write!(
                f,
                "Key {field} values ({candidate} and {reference}) do not match"
            ),
            Self::ToleranceExceeded {
                field,
                candidate,
                reference,
                rtol,
            } => write!(
                f,
                "Key {field} values ({candidate} and {reference}) differ by more than {}%",
                rtol * 100.0
            ),
            Self::EnvelopeExceeded {
                field,
                observed,
                lower,
                upper,
            } => write!(
                f,
                "Key {field} value {observed} outside calibrated envelope ({lower}..{upper})"
            ),
        }
    }
}

/// Relative-tolerance equality for a pair of numeric values
///
/// Passes iff `|a - b| <= rtol * max(|a|, |b|)`. The boundary is inclusive:
/// a difference of exactly `rtol` relative to the larger magnitude passes.
#[must_use]
pub fn within_relative(a: f64, b: f64, rtol: f64) -> bool {
    (a - b).abs() <= rtol * a.abs().max(b.abs())
}

pub(crate) fn check_exact<T>(
    field: &'static str,
    candidate: T,
    reference: T,
    diagnostics: &mut Vec<Diagnostic>,
) where
    T: PartialEq + Into<AttrValue>,
{
    if candidate != reference {
        diagnostics.push(Diagnostic::ValueMismatch {
            field,
            candidate: candidate.into(),
            reference: reference.into(),
        });
    }
}

// Counts are integers on disk; statistics are floats. Widen before
// comparing.
pub(crate) fn check_relative(
    field: &'static str,
    candidate: i64,
    reference: i64,
    rtol: f64,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let (a, b) = (candidate as f64, reference as f64);
    if !within_relative(a, b, rtol) {
        diagnostics.push(Diagnostic::ToleranceExceeded {
            field,
            candidate: a,
            reference: b,
            rtol,
        });
    }
}

pub(crate) fn check_envelope(
    field: &'static str,
    observed: i64,
    envelope: &Envelope,
    k: f64,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let observed = observed as f64;
    if !envelope.contains(observed, k) {
        let (lower, upper) = envelope.bounds(k);
        diagnostics.push(Diagnostic::EnvelopeExceeded {
            field,
            observed,
            lower,
            upper,
        });
    }
}
