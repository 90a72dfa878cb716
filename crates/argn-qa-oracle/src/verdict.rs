//! Verdict aggregation
//!
//! Runs the key-set check first; a mismatch there produces a failing
//! verdict immediately and skips value checks. Otherwise every
//! deterministic and non-deterministic field is evaluated and every
//! divergence is collected, so one pass pinpoints all of them.

use crate::calibration::Calibration;
use crate::compare::{Diagnostic, check_envelope, check_exact, check_relative};
use crate::error::{Error, Result};
use crate::record::{ArgMetadata, AttrMap};
use serde::Serialize;

/// Outcome of one full comparison: pass/fail plus ordered diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// True iff the pass produced zero diagnostics
    #[must_use]
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics in evaluation order
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics rendered as ordered human-readable strings
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

/// Comparison oracle for ARG inference output records
///
/// Holds the injected [`Calibration`] and exposes the two comparison modes:
/// pairwise against a live reference record, and standalone against the
/// calibrated expected-value table.
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    calibration: Calibration,
}

impl Oracle {
    /// Create an oracle with the given calibration
    #[must_use]
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    /// The calibration in effect
    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    // Key-set mismatches become a failing verdict; any other load problem
    // (wrong scalar type) is a hard error surfaced to the caller.
    fn load(attrs: &AttrMap) -> Result<std::result::Result<ArgMetadata, Diagnostic>> {
        match ArgMetadata::from_attrs(attrs) {
            Ok(record) => Ok(Ok(record)),
            Err(Error::KeySet(mismatch)) => Ok(Err(Diagnostic::KeySet(mismatch))),
            Err(other) => Err(other),
        }
    }

    fn check_deterministic_pair(
        candidate: &ArgMetadata,
        reference: &ArgMetadata,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        check_exact(
            "arg_file_version",
            candidate.arg_file_version,
            reference.arg_file_version,
            diagnostics,
        );
        check_exact(
            "chromosome",
            candidate.chromosome,
            reference.chromosome,
            diagnostics,
        );
        check_exact("start", candidate.start, reference.start, diagnostics);
        check_exact("end", candidate.end, reference.end, diagnostics);
        check_exact(
            "mutations",
            candidate.mutations,
            reference.mutations,
            diagnostics,
        );
        check_exact(
            "node_bounds",
            candidate.node_bounds,
            reference.node_bounds,
            diagnostics,
        );
        check_exact("offset", candidate.offset, reference.offset, diagnostics);
        check_exact(
            "threaded_samples",
            candidate.threaded_samples,
            reference.threaded_samples,
            diagnostics,
        );
    }

    /// Compare a candidate record against a live reference record
    ///
    /// Deterministic fields must match exactly; `num_nodes` and `num_edges`
    /// must agree within the calibrated relative tolerance.
    /// `datetime_created` and `num_mutations` are never value-compared.
    ///
    /// # Errors
    ///
    /// Returns an error when either record carries a wrongly typed
    /// attribute. A key-set mismatch is a failing verdict, not an error.
    pub fn compare(&self, candidate: &AttrMap, reference: &AttrMap) -> Result<Verdict> {
        let candidate = match Self::load(candidate)? {
            Ok(record) => record,
            Err(diagnostic) => return Ok(Verdict::from_diagnostics(vec![diagnostic])),
        };
        let reference = match Self::load(reference)? {
            Ok(record) => record,
            Err(diagnostic) => return Ok(Verdict::from_diagnostics(vec![diagnostic])),
        };

        let mut diagnostics = Vec::new();
        Self::check_deterministic_pair(&candidate, &reference, &mut diagnostics);
        check_relative(
            "num_nodes",
            candidate.num_nodes,
            reference.num_nodes,
            self.calibration.rtol,
            &mut diagnostics,
        );
        check_relative(
            "num_edges",
            candidate.num_edges,
            reference.num_edges,
            self.calibration.rtol,
            &mut diagnostics,
        );
        Ok(Verdict::from_diagnostics(diagnostics))
    }

    /// Check a candidate record against the calibrated expected values
    ///
    /// Deterministic fields must equal the expected literals exactly;
    /// `num_nodes` and `num_edges` must fall strictly inside their
    /// calibrated envelopes at `k` standard deviations.
    ///
    /// # Errors
    ///
    /// Returns an error when the record carries a wrongly typed attribute
    /// or when a non-deterministic field has no calibrated envelope.
    pub fn check(&self, candidate: &AttrMap) -> Result<Verdict> {
        let record = match Self::load(candidate)? {
            Ok(record) => record,
            Err(diagnostic) => return Ok(Verdict::from_diagnostics(vec![diagnostic])),
        };

        let expected = &self.calibration.expected;
        let mut diagnostics = Vec::new();
        check_exact(
            "arg_file_version",
            record.arg_file_version,
            expected.arg_file_version,
            &mut diagnostics,
        );
        check_exact(
            "chromosome",
            record.chromosome,
            expected.chromosome,
            &mut diagnostics,
        );
        check_exact("start", record.start, expected.start, &mut diagnostics);
        check_exact("end", record.end, expected.end, &mut diagnostics);
        check_exact(
            "mutations",
            record.mutations,
            expected.mutations,
            &mut diagnostics,
        );
        check_exact(
            "node_bounds",
            record.node_bounds,
            expected.node_bounds,
            &mut diagnostics,
        );
        check_exact("offset", record.offset, expected.offset, &mut diagnostics);
        check_exact(
            "threaded_samples",
            record.threaded_samples,
            expected.threaded_samples,
            &mut diagnostics,
        );

        for (field, observed) in [
            ("num_nodes", record.num_nodes),
            ("num_edges", record.num_edges),
        ] {
            let envelope = self
                .calibration
                .envelope(field)
                .ok_or(Error::MissingEnvelope(field))?;
            check_envelope(field, observed, envelope, self.calibration.k, &mut diagnostics);
        }
        Ok(Verdict::from_diagnostics(diagnostics))
    }
}
