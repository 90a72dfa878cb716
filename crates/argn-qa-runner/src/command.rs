//! Pipeline invocation abstraction for testability
//!
//! The inference pipeline is an opaque external collaborator: two binaries
//! run in sequence inside a scratch working directory. This module puts a
//! trait in front of that invocation so the run logic can be exercised with
//! a mock that synthesizes artifacts instead of spawning processes.

use crate::container::write_container;
use argn_qa_oracle::{ArgMetadata, Calibration};
use std::path::Path;

/// Result of executing one pipeline stage
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code (negative for signals)
    pub exit_code: i32,
    /// Whether the stage succeeded
    pub success: bool,
}

impl CommandOutput {
    /// Create a successful stage output
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
            success: true,
        }
    }

    /// Create a failed stage output
    #[must_use]
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
            success: false,
        }
    }
}

/// Trait for invoking the two pipeline stages
pub trait PipelineRunner: Send + Sync {
    /// Run the data-preparation stage inside `workdir`
    fn prepare_example(&self, workdir: &Path) -> CommandOutput;

    /// Run the inference stage inside `workdir`
    ///
    /// `normalize` maps to the stage's normalization flag.
    fn infer_args(&self, workdir: &Path, normalize: bool) -> CommandOutput;
}

/// Real runner that spawns the external pipeline binaries
#[derive(Debug, Clone)]
pub struct RealPipelineRunner {
    /// Data-preparation binary (default: "prepare_example")
    pub prepare_binary: String,
    /// Inference binary (default: "infer_args")
    pub infer_binary: String,
}

impl Default for RealPipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RealPipelineRunner {
    /// Create a runner using the default binary names
    #[must_use]
    pub fn new() -> Self {
        Self {
            prepare_binary: "prepare_example".to_string(),
            infer_binary: "infer_args".to_string(),
        }
    }

    /// Create a runner with custom binary paths
    #[must_use]
    pub fn with_binaries(prepare: impl Into<String>, infer: impl Into<String>) -> Self {
        Self {
            prepare_binary: prepare.into(),
            infer_binary: infer.into(),
        }
    }

    fn execute(binary: &str, args: &[&str], workdir: &Path) -> CommandOutput {
        use std::process::Command;

        match Command::new(binary).args(args).current_dir(workdir).output() {
            Ok(output) => CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                success: output.status.success(),
            },
            Err(e) => CommandOutput::failure(-1, format!("Failed to execute {binary}: {e}")),
        }
    }
}

impl PipelineRunner for RealPipelineRunner {
    fn prepare_example(&self, workdir: &Path) -> CommandOutput {
        Self::execute(&self.prepare_binary, &[], workdir)
    }

    fn infer_args(&self, workdir: &Path, normalize: bool) -> CommandOutput {
        let flag = if normalize { "1" } else { "0" };
        Self::execute(&self.infer_binary, &["--normalize", flag], workdir)
    }
}

/// Mock runner that synthesizes an artifact instead of spawning processes
#[derive(Debug, Clone)]
pub struct MockPipelineRunner {
    /// Record written into the synthesized artifact
    pub record: ArgMetadata,
    /// Artifact file name written by the inference stage
    pub artifact_name: String,
    /// Whether the preparation stage should succeed
    pub prepare_success: bool,
    /// Whether the inference stage should succeed
    pub infer_success: bool,
}

impl Default for MockPipelineRunner {
    fn default() -> Self {
        let expected = Calibration::default().expected;
        Self {
            record: ArgMetadata {
                arg_file_version: expected.arg_file_version,
                chromosome: expected.chromosome,
                start: expected.start,
                end: expected.end,
                mutations: expected.mutations,
                node_bounds: expected.node_bounds,
                offset: expected.offset,
                threaded_samples: expected.threaded_samples,
                num_nodes: 17_203,
                num_edges: 93_655,
                num_mutations: 0,
                datetime_created: "2024-05-17T09:31:02".to_string(),
            },
            artifact_name: "example.argn".to_string(),
            prepare_success: true,
            infer_success: true,
        }
    }
}

impl MockPipelineRunner {
    /// Create a mock producing a record that matches the default calibration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record written into the artifact
    #[must_use]
    pub fn with_record(mut self, record: ArgMetadata) -> Self {
        self.record = record;
        self
    }

    /// Set the artifact file name
    #[must_use]
    pub fn with_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_name = name.into();
        self
    }

    /// Make the preparation stage fail
    #[must_use]
    pub fn with_prepare_failure(mut self) -> Self {
        self.prepare_success = false;
        self
    }

    /// Make the inference stage fail
    #[must_use]
    pub fn with_infer_failure(mut self) -> Self {
        self.infer_success = false;
        self
    }
}

impl PipelineRunner for MockPipelineRunner {
    fn prepare_example(&self, workdir: &Path) -> CommandOutput {
        if !self.prepare_success {
            return CommandOutput::failure(1, "Preparation failed");
        }
        match std::fs::write(workdir.join("example.haps"), b"mock haplotypes") {
            Ok(()) => CommandOutput::success("Prepared example data"),
            Err(e) => CommandOutput::failure(-1, e.to_string()),
        }
    }

    fn infer_args(&self, workdir: &Path, _normalize: bool) -> CommandOutput {
        if !self.infer_success {
            return CommandOutput::failure(1, "Inference failed");
        }
        let path = workdir.join(&self.artifact_name);
        match write_container(&path, &self.record.to_attrs(), b"mock tables") {
            Ok(()) => CommandOutput::success("Threaded 400 samples"),
            Err(e) => CommandOutput::failure(-1, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::read_root_attrs;

    #[test]
    fn test_command_output_success() {
        let output = CommandOutput::success("done");
        assert!(output.success);
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "done");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_command_output_failure() {
        let output = CommandOutput::failure(2, "boom");
        assert!(!output.success);
        assert_eq!(output.exit_code, 2);
        assert_eq!(output.stderr, "boom");
    }

    #[test]
    fn test_real_runner_defaults() {
        let runner = RealPipelineRunner::new();
        assert_eq!(runner.prepare_binary, "prepare_example");
        assert_eq!(runner.infer_binary, "infer_args");
    }

    #[test]
    fn test_real_runner_with_binaries() {
        let runner = RealPipelineRunner::with_binaries("/opt/prep", "/opt/infer");
        assert_eq!(runner.prepare_binary, "/opt/prep");
        assert_eq!(runner.infer_binary, "/opt/infer");
    }

    #[test]
    fn test_real_runner_missing_binary_reports_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner =
            RealPipelineRunner::with_binaries("argn-qa-no-such-binary", "argn-qa-no-such-binary");
        let output = runner.prepare_example(dir.path());
        assert!(!output.success);
        assert_eq!(output.exit_code, -1);
    }

    #[test]
    fn test_mock_writes_readable_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = MockPipelineRunner::new();

        assert!(runner.prepare_example(dir.path()).success);
        assert!(runner.infer_args(dir.path(), false).success);

        let attrs = read_root_attrs(&dir.path().join("example.argn")).expect("read artifact");
        assert_eq!(attrs, runner.record.to_attrs());
    }

    #[test]
    fn test_mock_prepare_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = MockPipelineRunner::new().with_prepare_failure();
        let output = runner.prepare_example(dir.path());
        assert!(!output.success);
        assert_eq!(output.exit_code, 1);
    }

    #[test]
    fn test_mock_infer_failure_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = MockPipelineRunner::new().with_infer_failure();
        let output = runner.infer_args(dir.path(), false);
        assert!(!output.success);
        assert!(!dir.path().join("example.argn").exists());
    }

    #[test]
    fn test_mock_custom_artifact_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = MockPipelineRunner::new().with_artifact_name("chr1.argn");
        assert!(runner.infer_args(dir.path(), true).success);
        assert!(dir.path().join("chr1.argn").exists());
    }

    #[test]
    fn test_mock_with_record_builder() {
        let mut record = MockPipelineRunner::new().record;
        record.num_nodes = 99;
        let runner = MockPipelineRunner::new().with_record(record.clone());
        assert_eq!(runner.record, record);
    }
}
