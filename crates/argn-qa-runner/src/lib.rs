//! ARGN QA Runner
//!
//! Collaborators around the comparison oracle: invoking the external
//! inference pipeline inside a scoped scratch directory, reading the root
//! attribute block of produced containers, and recording run evidence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
// Allow common patterns
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::redundant_clone))]

pub mod command;
pub mod container;
pub mod error;
pub mod evidence;
pub mod pipeline;

pub use command::{CommandOutput, MockPipelineRunner, PipelineRunner, RealPipelineRunner};
pub use container::{read_root_attrs, write_container};
pub use error::{Error, Result};
pub use evidence::{HostInfo, Outcome, RunEvidence, compute_sha256};
pub use pipeline::{PipelineConfig, PipelineRun, run_pipeline};
