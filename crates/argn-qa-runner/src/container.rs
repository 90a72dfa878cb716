//! Root attribute access for ARGN containers
//!
//! An ARGN container is self-describing: magic bytes, a two-byte format
//! version, a little-endian header length, the JSON-encoded root attribute
//! block, then the payload (node and edge tables). Only the attribute block
//! is read here; the payload stays opaque.
//!
//! Layout:
//!
//! ```text
//! \x93ARGN | major minor | header_len: u32 LE | attrs JSON | payload...
//! ```

use crate::error::{Error, Result};
use argn_qa_oracle::AttrMap;
use std::path::Path;

const ARGN_MAGIC: [u8; 5] = *b"\x93ARGN";
const ARGN_VERSION: (u8, u8) = (1, 0);

// magic + version + length field
const PREAMBLE_LEN: usize = ARGN_MAGIC.len() + 2 + 4;

// Attribute blocks are small; anything past this is a corrupt length field.
const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Read the root attribute block of a container
///
/// # Errors
///
/// Returns an error when the magic or version is wrong, when the file ends
/// before the declared header span, or when the header is not a flat JSON
/// map of scalar attributes.
pub fn read_root_attrs(path: &Path) -> Result<AttrMap> {
    let payload = std::fs::read(path)?;

    if payload.len() < PREAMBLE_LEN {
        return Err(Error::TruncatedHeader);
    }
    if payload[..ARGN_MAGIC.len()] != ARGN_MAGIC {
        return Err(Error::MagicInvalid(path.to_path_buf()));
    }
    let (major, minor) = (payload[5], payload[6]);
    if (major, minor) != ARGN_VERSION {
        return Err(Error::UnsupportedVersion { major, minor });
    }

    let header_len =
        u32::from_le_bytes([payload[7], payload[8], payload[9], payload[10]]) as usize;
    if header_len == 0 || header_len > MAX_HEADER_BYTES {
        return Err(Error::TruncatedHeader);
    }
    let end = PREAMBLE_LEN
        .checked_add(header_len)
        .ok_or(Error::TruncatedHeader)?;
    if payload.len() < end {
        return Err(Error::TruncatedHeader);
    }

    serde_json::from_slice(&payload[PREAMBLE_LEN..end]).map_err(Error::HeaderJson)
}

/// Write a container with the given root attributes and payload
///
/// Exists for the mock pipeline runner and for test fixtures; the real
/// pipeline produces its own containers.
///
/// # Errors
///
/// Returns an error when the attributes cannot be serialized or the file
/// cannot be written.
pub fn write_container(path: &Path, attrs: &AttrMap, payload: &[u8]) -> Result<()> {
    let header = serde_json::to_vec(attrs)?;
    let header_len = u32::try_from(header.len()).map_err(|_| Error::TruncatedHeader)?;

    let mut bytes = Vec::with_capacity(PREAMBLE_LEN + header.len() + payload.len());
    bytes.extend_from_slice(&ARGN_MAGIC);
    bytes.push(ARGN_VERSION.0);
    bytes.push(ARGN_VERSION.1);
    bytes.extend_from_slice(&header_len.to_le_bytes());
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(payload);
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argn_qa_oracle::AttrValue;

    fn sample_attrs() -> AttrMap {
        let mut attrs = AttrMap::new();
        attrs.insert("chromosome".into(), AttrValue::Int(1));
        attrs.insert("start".into(), AttrValue::Float(0.0));
        attrs.insert("mutations".into(), AttrValue::Bool(false));
        attrs.insert("datetime_created".into(), AttrValue::Str("t".into()));
        attrs
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("example.argn");
        let attrs = sample_attrs();

        write_container(&path, &attrs, b"node and edge tables").expect("write");
        let read = read_root_attrs(&path).expect("read");
        assert_eq!(read, attrs);
    }

    #[test]
    fn test_payload_does_not_affect_attrs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.argn");
        let b = dir.path().join("b.argn");
        let attrs = sample_attrs();

        write_container(&a, &attrs, b"").expect("write");
        write_container(&b, &attrs, &[0xFF; 4096]).expect("write");
        assert_eq!(read_root_attrs(&a).expect("a"), read_root_attrs(&b).expect("b"));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.argn");
        std::fs::write(&path, b"\x89HDF\r\n\x1a\n rest of some other container").expect("write");

        let err = read_root_attrs(&path).unwrap_err();
        assert!(matches!(err, Error::MagicInvalid(_)));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("future.argn");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ARGN_MAGIC);
        bytes.extend_from_slice(&[2, 0]);
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"{}");
        std::fs::write(&path, bytes).expect("write");

        let err = read_root_attrs(&path).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedVersion { major: 2, minor: 0 }
        ));
    }

    #[test]
    fn test_truncated_preamble_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("short.argn");
        std::fs::write(&path, &ARGN_MAGIC[..3]).expect("write");

        let err = read_root_attrs(&path).unwrap_err();
        assert!(matches!(err, Error::TruncatedHeader));
    }

    #[test]
    fn test_truncated_header_span_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cut.argn");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ARGN_MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&500u32.to_le_bytes());
        bytes.extend_from_slice(b"{\"chromosome\": 1}");
        std::fs::write(&path, bytes).expect("write");

        let err = read_root_attrs(&path).unwrap_err();
        assert!(matches!(err, Error::TruncatedHeader));
    }

    #[test]
    fn test_zero_length_header_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.argn");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ARGN_MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        std::fs::write(&path, bytes).expect("write");

        let err = read_root_attrs(&path).unwrap_err();
        assert!(matches!(err, Error::TruncatedHeader));
    }

    #[test]
    fn test_nested_header_value_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested.argn");
        let header = b"{\"chromosome\": {\"nested\": 1}}";
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ARGN_MAGIC);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(header.len() as u32).to_le_bytes());
        bytes.extend_from_slice(header);
        std::fs::write(&path, bytes).expect("write");

        let err = read_root_attrs(&path).unwrap_err();
        assert!(matches!(err, Error::HeaderJson(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_root_attrs(Path::new("/nonexistent/example.argn")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
