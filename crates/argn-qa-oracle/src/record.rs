//! Typed metadata record for ARG inference output
//!
//! The container exposes a flat map of scalar attributes at its root. That
//! map is validated into [`ArgMetadata`] at the read boundary: wrong key
//! sets and wrong scalar types are rejected here, before any comparison
//! logic runs.

use crate::error::{Error, Result};
use crate::keyset::validate_key_set;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar attribute value as stored in the container root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Boolean flag
    Bool(bool),
    /// Integer count or identifier
    Int(i64),
    /// Floating point coordinate
    Float(f64),
    /// Text, e.g. a creation timestamp
    Str(String),
}

impl AttrValue {
    /// Scalar type name for diagnostics
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// Root attribute map of a container, ordered by key
pub type AttrMap = BTreeMap<String, AttrValue>;

/// Metadata header of one inference run's output artifact
///
/// Created once when a run completes and read-only thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgMetadata {
    /// Container format version
    pub arg_file_version: i64,
    /// Chromosome the ARG covers
    pub chromosome: i64,
    /// Region start coordinate in base pairs
    pub start: f64,
    /// Region end coordinate in base pairs
    pub end: f64,
    /// Whether mutations were threaded onto the ARG
    pub mutations: bool,
    /// Whether per-node span bounds are stored
    pub node_bounds: bool,
    /// Genome-wide offset of the region
    pub offset: i64,
    /// Number of samples threaded during inference
    pub threaded_samples: i64,
    /// Node count; varies run to run
    pub num_nodes: i64,
    /// Edge count; varies run to run
    pub num_edges: i64,
    /// Mutation count; tracked in the key set but never value-compared
    pub num_mutations: i64,
    /// Creation timestamp; never compared
    pub datetime_created: String,
}

fn get<'a>(attrs: &'a AttrMap, field: &'static str) -> Result<&'a AttrValue> {
    attrs.get(field).ok_or(Error::MissingAttr(field))
}

fn get_i64(attrs: &AttrMap, field: &'static str) -> Result<i64> {
    match get(attrs, field)? {
        AttrValue::Int(v) => Ok(*v),
        other => Err(Error::SchemaViolation {
            field,
            expected: "integer",
            got: other.type_name(),
        }),
    }
}

// Float fields tolerate an integral on-disk encoding; the reverse is not
// allowed.
fn get_f64(attrs: &AttrMap, field: &'static str) -> Result<f64> {
    match get(attrs, field)? {
        AttrValue::Float(v) => Ok(*v),
        AttrValue::Int(v) => Ok(*v as f64),
        other => Err(Error::SchemaViolation {
            field,
            expected: "float",
            got: other.type_name(),
        }),
    }
}

fn get_bool(attrs: &AttrMap, field: &'static str) -> Result<bool> {
    match get(attrs, field)? {
        AttrValue::Bool(v) => Ok(*v),
        other => Err(Error::SchemaViolation {
            field,
            expected: "boolean",
            got: other.type_name(),
        }),
    }
}

fn get_str(attrs: &AttrMap, field: &'static str) -> Result<String> {
    match get(attrs, field)? {
        AttrValue::Str(v) => Ok(v.clone()),
        other => Err(Error::SchemaViolation {
            field,
            expected: "string",
            got: other.type_name(),
        }),
    }
}

impl ArgMetadata {
    /// Validate a raw attribute map into a typed record
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeySet`] when the key set deviates from the
    /// canonical schema, and [`Error::SchemaViolation`] when an attribute
    /// carries the wrong scalar type.
    pub fn from_attrs(attrs: &AttrMap) -> Result<Self> {
        validate_key_set(attrs.keys())?;

        Ok(Self {
            arg_file_version: get_i64(attrs, "arg_file_version")?,
            chromosome: get_i64(attrs, "chromosome")?,
            start: get_f64(attrs, "start")?,
            end: get_f64(attrs, "end")?,
            mutations: get_bool(attrs, "mutations")?,
            node_bounds: get_bool(attrs, "node_bounds")?,
            offset: get_i64(attrs, "offset")?,
            threaded_samples: get_i64(attrs, "threaded_samples")?,
            num_nodes: get_i64(attrs, "num_nodes")?,
            num_edges: get_i64(attrs, "num_edges")?,
            num_mutations: get_i64(attrs, "num_mutations")?,
            datetime_created: get_str(attrs, "datetime_created")?,
        })
    }

    /// Render the record back into a raw attribute map
    ///
    /// Used when synthesizing artifacts, e.g. by the mock pipeline runner.
    #[must_use]
    pub fn to_attrs(&self) -> AttrMap {
        let mut attrs = AttrMap::new();
        attrs.insert("arg_file_version".into(), self.arg_file_version.into());
        attrs.insert("chromosome".into(), self.chromosome.into());
        attrs.insert("start".into(), self.start.into());
        attrs.insert("end".into(), self.end.into());
        attrs.insert("mutations".into(), self.mutations.into());
        attrs.insert("node_bounds".into(), self.node_bounds.into());
        attrs.insert("offset".into(), self.offset.into());
        attrs.insert("threaded_samples".into(), self.threaded_samples.into());
        attrs.insert("num_nodes".into(), self.num_nodes.into());
        attrs.insert("num_edges".into(), self.num_edges.into());
        attrs.insert("num_mutations".into(), self.num_mutations.into());
        attrs.insert(
            "datetime_created".into(),
            self.datetime_created.as_str().into(),
        );
        attrs
    }
}
