//! ARGN QA CLI
//!
//! Library surface behind the `argn-qa` binary: file-level comparison entry
//! points and the end-to-end run-then-check flow.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
// Allow common patterns
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use argn_qa_oracle::{Calibration, Oracle, Verdict};
use argn_qa_runner::{
    PipelineConfig, PipelineRunner, Result, RunEvidence, read_root_attrs, run_pipeline,
};
use std::path::Path;
use std::time::Instant;

/// Load a calibration file, or the shipped defaults when no path is given
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed.
pub fn load_calibration(path: Option<&Path>) -> argn_qa_oracle::Result<Calibration> {
    path.map_or_else(|| Ok(Calibration::default()), Calibration::load)
}

/// Compare a candidate container against a frozen reference container
///
/// # Errors
///
/// Returns an error when either container cannot be read or carries a
/// wrongly typed attribute.
pub fn compare_files(
    candidate: &Path,
    reference: &Path,
    calibration: &Calibration,
) -> Result<Verdict> {
    let candidate = read_root_attrs(candidate)?;
    let reference = read_root_attrs(reference)?;
    let oracle = Oracle::new(calibration.clone());
    Ok(oracle.compare(&candidate, &reference)?)
}

/// Check a candidate container against the calibrated expected values
///
/// # Errors
///
/// Returns an error when the container cannot be read, carries a wrongly
/// typed attribute, or a non-deterministic field has no envelope.
pub fn check_file(candidate: &Path, calibration: &Calibration) -> Result<Verdict> {
    let candidate = read_root_attrs(candidate)?;
    let oracle = Oracle::new(calibration.clone());
    Ok(oracle.check(&candidate)?)
}

/// Run the pipeline in a scratch directory and check the produced artifact
///
/// With a `reference` the artifact is compared pairwise; without one it is
/// checked against the calibrated table. Evidence is recorded regardless of
/// outcome when `evidence_out` is given, including pipeline crashes.
///
/// # Errors
///
/// Returns an error when a pipeline stage fails, the artifact is absent or
/// unreadable, or evidence cannot be written.
pub fn run_and_check(
    runner: &dyn PipelineRunner,
    config: &PipelineConfig,
    reference: Option<&Path>,
    calibration: &Calibration,
    evidence_out: Option<&Path>,
) -> Result<Verdict> {
    let started = Instant::now();

    let run = match run_pipeline(runner, config) {
        Ok(run) => run,
        Err(err) => {
            if let Some(out) = evidence_out {
                let evidence =
                    RunEvidence::crashed(err.to_string(), elapsed_ms(started));
                std::fs::write(out, evidence.to_json()?)?;
            }
            return Err(err);
        }
    };

    let candidate = read_root_attrs(run.artifact_path())?;
    let oracle = Oracle::new(calibration.clone());
    let verdict = match reference {
        Some(path) => oracle.compare(&candidate, &read_root_attrs(path)?)?,
        None => oracle.check(&candidate)?,
    };

    if let Some(out) = evidence_out {
        let evidence = RunEvidence::from_verdict(&verdict, elapsed_ms(started))
            .with_artifact(run.artifact_path())?;
        std::fs::write(out, evidence.to_json()?)?;
    }
    Ok(verdict)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
