//! ARGN QA Oracle
//!
//! Regression oracle for ARG inference output containers.
//! Classifies container metadata fields into deterministic (exact match)
//! and non-deterministic (statistical envelope) and aggregates per-field
//! results into a single verdict with ordered diagnostics.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
// Allow common patterns
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
// Exact equality on deterministic float fields is the contract
#![allow(clippy::float_cmp)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::redundant_clone))]
#![cfg_attr(test, allow(clippy::cast_sign_loss))]

pub mod calibration;
pub mod compare;
pub mod error;
pub mod keyset;
pub mod record;
pub mod verdict;

pub use calibration::{Calibration, Envelope, ExpectedAttrs};
pub use compare::{Diagnostic, within_relative};
pub use error::{Error, Result};
pub use keyset::{ARGN_KEYS, KeySetMismatch, validate_key_set};
pub use record::{ArgMetadata, AttrMap, AttrValue};
pub use verdict::{Oracle, Verdict};
