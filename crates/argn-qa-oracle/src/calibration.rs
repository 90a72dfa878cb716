//! Calibration data for the comparison oracle
//!
//! Tolerances, expected literals and per-field envelopes are externally
//! supplied calibration data, not comparison logic. They are injected into
//! the oracle as one structure, deserializable from YAML, so the oracle is
//! reusable across datasets and pipelines. The serde defaults carry the
//! constants calibrated against roughly one hundred reference runs of the
//! example dataset.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Acceptance band for one non-deterministic field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Mean over repeated independent reference runs
    pub mean: f64,
    /// Standard deviation over those runs
    pub std: f64,
}

impl Envelope {
    /// Exclusive acceptance bounds at `k` standard deviations
    #[must_use]
    pub fn bounds(&self, k: f64) -> (f64, f64) {
        (k.mul_add(-self.std, self.mean), k.mul_add(self.std, self.mean))
    }

    /// Whether `observed` lies strictly inside the band at `k` deviations
    #[must_use]
    pub fn contains(&self, observed: f64, k: f64) -> bool {
        let (lower, upper) = self.bounds(k);
        lower < observed && observed < upper
    }
}

/// Expected literal values for the deterministic fields of the example run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedAttrs {
    /// Container format version
    #[serde(default = "default_arg_file_version")]
    pub arg_file_version: i64,
    /// Chromosome identifier
    #[serde(default = "default_chromosome")]
    pub chromosome: i64,
    /// Region start coordinate
    #[serde(default = "default_start")]
    pub start: f64,
    /// Region end coordinate
    #[serde(default = "default_end")]
    pub end: f64,
    /// Mutation threading flag
    #[serde(default = "default_mutations")]
    pub mutations: bool,
    /// Node bounds flag
    #[serde(default = "default_node_bounds")]
    pub node_bounds: bool,
    /// Genome-wide region offset
    #[serde(default = "default_offset")]
    pub offset: i64,
    /// Threaded sample count
    #[serde(default = "default_threaded_samples")]
    pub threaded_samples: i64,
}

fn default_arg_file_version() -> i64 {
    2
}

fn default_chromosome() -> i64 {
    1
}

fn default_start() -> f64 {
    0.0
}

fn default_end() -> f64 {
    2_000_079.0
}

fn default_mutations() -> bool {
    false
}

fn default_node_bounds() -> bool {
    true
}

fn default_offset() -> i64 {
    10_001_457
}

fn default_threaded_samples() -> i64 {
    400
}

impl Default for ExpectedAttrs {
    fn default() -> Self {
        Self {
            arg_file_version: default_arg_file_version(),
            chromosome: default_chromosome(),
            start: default_start(),
            end: default_end(),
            mutations: default_mutations(),
            node_bounds: default_node_bounds(),
            offset: default_offset(),
            threaded_samples: default_threaded_samples(),
        }
    }
}

/// Full calibration structure injected into the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Relative tolerance for reference-file comparison of counts
    #[serde(default = "default_rtol")]
    pub rtol: f64,
    /// Envelope width in standard deviations
    #[serde(default = "default_k")]
    pub k: f64,
    /// Calibrated envelopes per non-deterministic field
    #[serde(default = "default_envelopes")]
    pub envelopes: BTreeMap<String, Envelope>,
    /// Expected literals for deterministic fields
    #[serde(default)]
    pub expected: ExpectedAttrs,
}

fn default_rtol() -> f64 {
    0.01
}

fn default_k() -> f64 {
    3.0
}

fn default_envelopes() -> BTreeMap<String, Envelope> {
    let mut envelopes = BTreeMap::new();
    envelopes.insert(
        "num_nodes".to_string(),
        Envelope {
            mean: 17_203.697_92,
            std: 127.839_465_1,
        },
    );
    envelopes.insert(
        "num_edges".to_string(),
        Envelope {
            mean: 93_654.989_58,
            std: 591.756_235_3,
        },
    );
    envelopes
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rtol: default_rtol(),
            k: default_k(),
            envelopes: default_envelopes(),
            expected: ExpectedAttrs::default(),
        }
    }
}

impl Calibration {
    /// Parse a calibration structure from YAML text
    ///
    /// Omitted fields fall back to the shipped defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CalibrationParse`] on malformed YAML.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a calibration file from disk
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::CalibrationIo`] when the file cannot be read
    /// and [`crate::Error::CalibrationParse`] when it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Envelope for a non-deterministic field, if calibrated
    #[must_use]
    pub fn envelope(&self, field: &str) -> Option<&Envelope> {
        self.envelopes.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_carries_example_constants() {
        let calibration = Calibration::default();
        assert!((calibration.rtol - 0.01).abs() < 1e-12);
        assert!((calibration.k - 3.0).abs() < 1e-12);
        assert_eq!(calibration.expected.arg_file_version, 2);
        assert_eq!(calibration.expected.offset, 10_001_457);

        let nodes = calibration.envelope("num_nodes").expect("nodes envelope");
        assert!((nodes.mean - 17_203.697_92).abs() < 1e-6);
        let edges = calibration.envelope("num_edges").expect("edges envelope");
        assert!((edges.std - 591.756_235_3).abs() < 1e-6);
    }

    #[test]
    fn test_envelope_bounds() {
        let envelope = Envelope { mean: 100.0, std: 10.0 };
        let (lower, upper) = envelope.bounds(3.0);
        assert!((lower - 70.0).abs() < 1e-9);
        assert!((upper - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_contains_is_strict() {
        let envelope = Envelope { mean: 100.0, std: 10.0 };
        assert!(envelope.contains(100.0, 3.0));
        assert!(envelope.contains(129.0, 3.0));
        assert!(!envelope.contains(130.0, 3.0));
        assert!(!envelope.contains(70.0, 3.0));
        assert!(!envelope.contains(131.0, 3.0));
    }

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let calibration = Calibration::from_yaml("{}").expect("empty mapping parses");
        assert_eq!(calibration, Calibration::default());
    }

    #[test]
    fn test_yaml_overrides_selected_fields() {
        let text = "
rtol: 0.05
envelopes:
  num_nodes: { mean: 500.0, std: 10.0 }
";
        let calibration = Calibration::from_yaml(text).expect("parses");
        assert!((calibration.rtol - 0.05).abs() < 1e-12);
        assert!((calibration.k - 3.0).abs() < 1e-12);
        assert_eq!(calibration.envelopes.len(), 1);
        let nodes = calibration.envelope("num_nodes").expect("override");
        assert!((nodes.mean - 500.0).abs() < 1e-9);
        assert_eq!(calibration.expected, ExpectedAttrs::default());
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = Calibration::from_yaml("rtol: [not, a, number]").unwrap_err();
        assert!(matches!(err, crate::Error::CalibrationParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("calibration.yaml");
        std::fs::write(&path, "k: 2.5\n").expect("write calibration");

        let calibration = Calibration::load(&path).expect("load");
        assert!((calibration.k - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Calibration::load(Path::new("/nonexistent/calibration.yaml")).unwrap_err();
        assert!(matches!(err, crate::Error::CalibrationIo(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let calibration = Calibration::default();
        let text = serde_yaml::to_string(&calibration).expect("serialize");
        let parsed = Calibration::from_yaml(&text).expect("reparse");
        assert_eq!(parsed, calibration);
    }
}
