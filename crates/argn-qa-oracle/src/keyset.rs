//! Key-set validation for ARGN root attributes
//!
//! A produced container must carry exactly the canonical attribute keys.
//! A missing or extraneous key makes value comparison meaningless, so this
//! check runs first and short-circuits the rest of the oracle.

use serde::Serialize;
use std::fmt;

/// Canonical attribute keys of an ARGN container, sorted
pub const ARGN_KEYS: [&str; 12] = [
    "arg_file_version",
    "chromosome",
    "datetime_created",
    "end",
    "mutations",
    "node_bounds",
    "num_edges",
    "num_mutations",
    "num_nodes",
    "offset",
    "start",
    "threaded_samples",
];

/// Key-set mismatch between an observed record and the canonical schema
///
/// Carries both full key lists, sorted, so the diff is deterministic and a
/// reader can see exactly which keys are missing or extraneous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySetMismatch {
    /// Canonical key list, sorted
    pub expected: Vec<String>,
    /// Observed key list, sorted
    pub observed: Vec<String>,
}

impl fmt::Display for KeySetMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expected keys [{}] but observed [{}]",
            self.expected.join(", "),
            self.observed.join(", ")
        )
    }
}

impl std::error::Error for KeySetMismatch {}

/// Validate an observed key set against the canonical ARGN key set
///
/// Input order does not matter; keys are sorted before comparison.
///
/// # Errors
///
/// Returns a [`KeySetMismatch`] naming both full sorted key lists when the
/// observed set differs from the canonical set in any way.
pub fn validate_key_set<I, S>(keys: I) -> Result<(), KeySetMismatch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut observed: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
    observed.sort_unstable();

    if observed.iter().map(String::as_str).eq(ARGN_KEYS) {
        Ok(())
    } else {
        Err(KeySetMismatch {
            expected: ARGN_KEYS.iter().map(ToString::to_string).collect(),
            observed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_keys_pass() {
        assert!(validate_key_set(ARGN_KEYS).is_ok());
    }

    #[test]
    fn test_canonical_keys_are_sorted() {
        let mut sorted = ARGN_KEYS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, ARGN_KEYS);
    }

    #[test]
    fn test_unsorted_input_passes() {
        let mut shuffled = ARGN_KEYS.to_vec();
        shuffled.reverse();
        assert!(validate_key_set(shuffled).is_ok());
    }

    #[test]
    fn test_missing_key_fails() {
        let keys: Vec<&str> = ARGN_KEYS.iter().copied().filter(|k| *k != "offset").collect();
        let err = validate_key_set(keys).unwrap_err();
        assert!(err.expected.contains(&"offset".to_string()));
        assert!(!err.observed.contains(&"offset".to_string()));
    }

    #[test]
    fn test_extra_key_fails() {
        let mut keys = ARGN_KEYS.to_vec();
        keys.push("num_samples");
        let err = validate_key_set(keys).unwrap_err();
        assert!(err.observed.contains(&"num_samples".to_string()));
        assert!(!err.expected.contains(&"num_samples".to_string()));
    }

    #[test]
    fn test_empty_key_set_fails() {
        let err = validate_key_set(Vec::<&str>::new()).unwrap_err();
        assert!(err.observed.is_empty());
        assert_eq!(err.expected.len(), ARGN_KEYS.len());
    }

    #[test]
    fn test_mismatch_display_names_both_sets() {
        let keys = ["chromosome", "num_nodes"];
        let err = validate_key_set(keys).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("arg_file_version"));
        assert!(message.contains("Expected keys"));
        assert!(message.contains("observed"));
    }

    #[test]
    fn test_mismatch_observed_is_sorted() {
        let err = validate_key_set(["zzz", "aaa"]).unwrap_err();
        assert_eq!(err.observed, vec!["aaa".to_string(), "zzz".to_string()]);
    }
}
