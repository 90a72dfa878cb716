//! argn-qa
//!
//! Regression oracle for ARG inference output containers.

#![forbid(unsafe_code)]
#![allow(clippy::doc_markdown)]

use argn_qa_cli::{check_file, compare_files, load_calibration, run_and_check};
use argn_qa_oracle::Verdict;
use argn_qa_runner::{PipelineConfig, RealPipelineRunner};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "argn-qa")]
#[command(about = "Regression oracle for ARG inference output", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a candidate container against a frozen reference container
    Compare {
        /// Freshly produced container
        candidate: PathBuf,

        /// Frozen reference container
        reference: PathBuf,

        /// Calibration file (YAML); defaults to the shipped constants
        #[arg(long)]
        calibration: Option<PathBuf>,
    },

    /// Check a candidate container against calibrated expected values
    Check {
        /// Freshly produced container
        candidate: PathBuf,

        /// Calibration file (YAML); defaults to the shipped constants
        #[arg(long)]
        calibration: Option<PathBuf>,
    },

    /// Run the pipeline in a scratch directory and check its output
    Run {
        /// Data-preparation binary
        #[arg(long, default_value = "prepare_example")]
        prepare_bin: String,

        /// Inference binary
        #[arg(long, default_value = "infer_args")]
        infer_bin: String,

        /// Enable normalization in the inference stage
        #[arg(long)]
        normalize: bool,

        /// Artifact the pipeline is expected to produce
        #[arg(long, default_value = "example.argn")]
        artifact: String,

        /// Compare against this reference container instead of the
        /// calibrated table
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Calibration file (YAML); defaults to the shipped constants
        #[arg(long)]
        calibration: Option<PathBuf>,

        /// Write run evidence JSON to this path
        #[arg(long)]
        evidence: Option<PathBuf>,
    },
}

fn report(verdict: &Verdict) -> bool {
    if verdict.passed() {
        println!("PASS");
        return true;
    }
    for message in verdict.messages() {
        println!("{message}");
    }
    println!("FAIL: {} diagnostic(s)", verdict.diagnostics().len());
    false
}

fn main() {
    let cli = Cli::parse();

    let verdict = match cli.command {
        Commands::Compare {
            candidate,
            reference,
            calibration,
        } => load_calibration(calibration.as_deref())
            .map_err(argn_qa_runner::Error::from)
            .and_then(|calibration| compare_files(&candidate, &reference, &calibration)),
        Commands::Check {
            candidate,
            calibration,
        } => load_calibration(calibration.as_deref())
            .map_err(argn_qa_runner::Error::from)
            .and_then(|calibration| check_file(&candidate, &calibration)),
        Commands::Run {
            prepare_bin,
            infer_bin,
            normalize,
            artifact,
            reference,
            calibration,
            evidence,
        } => load_calibration(calibration.as_deref())
            .map_err(argn_qa_runner::Error::from)
            .and_then(|calibration| {
                let runner = RealPipelineRunner::with_binaries(prepare_bin, infer_bin);
                let config = PipelineConfig {
                    normalize,
                    artifact_name: artifact,
                };
                run_and_check(
                    &runner,
                    &config,
                    reference.as_deref(),
                    &calibration,
                    evidence.as_deref(),
                )
            }),
    };

    match verdict {
        Ok(verdict) => {
            if !report(&verdict) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}
