//! Run evidence for regression verdicts
//!
//! Every end-to-end run produces evidence that is recorded regardless of
//! outcome: the verdict, its diagnostics, a digest of the artifact under
//! test, and enough host context to reproduce the run.

use argn_qa_oracle::Verdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Outcome of one regression run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Output equivalent to the reference; hypothesis not falsified
    Corroborated,
    /// Oracle found at least one divergence
    Falsified,
    /// Pipeline failed before the oracle could run
    Crashed,
}

impl Outcome {
    /// Check if this is a passing outcome
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Corroborated)
    }
}

/// Host information for reproducibility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    /// Hostname
    pub hostname: String,
    /// Operating system
    pub os: String,
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            hostname: hostname::get().map_or_else(
                |_| "unknown".to_string(),
                |h| h.to_string_lossy().to_string(),
            ),
            os: std::env::consts::OS.to_string(),
        }
    }
}

/// Evidence from a single regression run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEvidence {
    /// Unique evidence ID
    pub id: String,
    /// Run outcome
    pub outcome: Outcome,
    /// Human-readable reason
    pub reason: String,
    /// Oracle diagnostics, in evaluation order
    pub diagnostics: Vec<String>,
    /// SHA-256 of the artifact under test, when one was produced
    pub artifact_sha256: Option<String>,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Host information
    pub host: HostInfo,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl RunEvidence {
    /// Build evidence from an oracle verdict
    #[must_use]
    pub fn from_verdict(verdict: &Verdict, duration_ms: u64) -> Self {
        let diagnostics = verdict.messages();
        let (outcome, reason) = if verdict.passed() {
            (Outcome::Corroborated, "Verdict passed".to_string())
        } else {
            (
                Outcome::Falsified,
                format!("Verdict failed with {} diagnostic(s)", diagnostics.len()),
            )
        };
        Self {
            id: evidence_id(),
            outcome,
            reason,
            diagnostics,
            artifact_sha256: None,
            timestamp: Utc::now(),
            host: HostInfo::default(),
            duration_ms,
        }
    }

    /// Build evidence for a run that died before the oracle
    #[must_use]
    pub fn crashed(reason: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            id: evidence_id(),
            outcome: Outcome::Crashed,
            reason: reason.into(),
            diagnostics: Vec::new(),
            artifact_sha256: None,
            timestamp: Utc::now(),
            host: HostInfo::default(),
            duration_ms,
        }
    }

    /// Attach the digest of the artifact under test
    ///
    /// # Errors
    ///
    /// Returns an error when the artifact cannot be read.
    pub fn with_artifact(mut self, path: &Path) -> std::io::Result<Self> {
        self.artifact_sha256 = Some(compute_sha256(path)?);
        Ok(self)
    }

    /// Export to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Compute the SHA-256 digest of a file, streaming
///
/// # Errors
///
/// Returns an error when the file cannot be opened or read.
pub fn compute_sha256(path: &Path) -> std::io::Result<String> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    let mut hasher = Sha256::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

fn evidence_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{timestamp:032x}")
}
