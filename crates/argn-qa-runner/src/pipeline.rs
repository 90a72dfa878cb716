//! End-to-end pipeline run inside a scoped scratch directory
//!
//! The two stages run sequentially with the scratch directory as their
//! working directory. A non-zero exit from either stage aborts the run; the
//! scratch directory is removed on every exit path because [`PipelineRun`]
//! owns the [`TempDir`].

use crate::command::PipelineRunner;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Configuration for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pass normalization through to the inference stage
    pub normalize: bool,
    /// Relative path of the artifact the pipeline is expected to produce
    pub artifact_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            normalize: false,
            artifact_name: "example.argn".to_string(),
        }
    }
}

/// A completed pipeline run holding its scratch directory alive
///
/// Dropping the value deletes the scratch tree together with the artifact,
/// so callers must finish reading the artifact before letting go.
#[derive(Debug)]
pub struct PipelineRun {
    scratch: TempDir,
    artifact: PathBuf,
}

impl PipelineRun {
    /// Path of the produced artifact inside the scratch directory
    #[must_use]
    pub fn artifact_path(&self) -> &Path {
        &self.artifact
    }

    /// Path of the scratch directory
    #[must_use]
    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }
}

/// Run both pipeline stages and locate the produced artifact
///
/// # Errors
///
/// Returns [`Error::StageFailed`] when either stage exits non-zero and
/// [`Error::ArtifactMissing`] when both stages succeed but the artifact is
/// not at its expected relative path. The scratch directory is removed in
/// every error case.
pub fn run_pipeline(runner: &dyn PipelineRunner, config: &PipelineConfig) -> Result<PipelineRun> {
    let scratch = tempfile::Builder::new().prefix("argn-qa-").tempdir()?;

    let prepared = runner.prepare_example(scratch.path());
    if !prepared.success {
        return Err(Error::StageFailed {
            stage: "prepare_example".to_string(),
            exit_code: prepared.exit_code,
            stderr: prepared.stderr,
        });
    }

    let inferred = runner.infer_args(scratch.path(), config.normalize);
    if !inferred.success {
        return Err(Error::StageFailed {
            stage: "infer_args".to_string(),
            exit_code: inferred.exit_code,
            stderr: inferred.stderr,
        });
    }

    let artifact = scratch.path().join(&config.artifact_name);
    if !artifact.is_file() {
        return Err(Error::ArtifactMissing(artifact));
    }

    Ok(PipelineRun { scratch, artifact })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockPipelineRunner;
    use crate::container::read_root_attrs;

    #[test]
    fn test_run_produces_readable_artifact() {
        let runner = MockPipelineRunner::new();
        let run = run_pipeline(&runner, &PipelineConfig::default()).expect("run succeeds");

        assert!(run.artifact_path().is_file());
        let attrs = read_root_attrs(run.artifact_path()).expect("read artifact");
        assert_eq!(attrs, runner.record.to_attrs());
    }

    #[test]
    fn test_scratch_removed_on_drop() {
        let runner = MockPipelineRunner::new();
        let run = run_pipeline(&runner, &PipelineConfig::default()).expect("run succeeds");
        let scratch = run.scratch_path().to_path_buf();
        assert!(scratch.is_dir());

        drop(run);
        assert!(!scratch.exists());
    }

    #[test]
    fn test_prepare_failure_is_fatal() {
        let runner = MockPipelineRunner::new().with_prepare_failure();
        let err = run_pipeline(&runner, &PipelineConfig::default()).unwrap_err();
        match err {
            Error::StageFailed {
                stage, exit_code, ..
            } => {
                assert_eq!(stage, "prepare_example");
                assert_eq!(exit_code, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_infer_failure_is_fatal() {
        let runner = MockPipelineRunner::new().with_infer_failure();
        let err = run_pipeline(&runner, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::StageFailed { stage, .. } if stage == "infer_args"));
    }

    #[test]
    fn test_missing_artifact_detected() {
        let runner = MockPipelineRunner::new().with_artifact_name("elsewhere.argn");
        let err = run_pipeline(&runner, &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ArtifactMissing(_)));
    }

    #[test]
    fn test_config_selects_artifact_name() {
        let runner = MockPipelineRunner::new().with_artifact_name("chr1.argn");
        let config = PipelineConfig {
            artifact_name: "chr1.argn".to_string(),
            ..PipelineConfig::default()
        };
        let run = run_pipeline(&runner, &config).expect("run succeeds");
        assert!(run.artifact_path().ends_with("chr1.argn"));
    }
}
