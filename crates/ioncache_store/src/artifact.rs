//! Binary encoding of valid cache entries.
//!
//! Layout: 4-byte little-endian header length, bincode header, then the
//! zlib-compressed bincode encoding of the record sequence. The header
//! carries magic bytes, a format version, the configuration's canonical
//! string, and a checksum of the compressed payload.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use ioncache_common::IonRecord;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Magic bytes identifying an ion cache artifact.
const ARTIFACT_MAGIC: [u8; 4] = *b"IONC";

/// Current artifact format version. Increment on breaking changes to
/// the header or payload format.
const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// zlib level for record payloads.
const COMPRESSION_LEVEL: u32 = 3;

/// Header prepended to every `.result` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Magic bytes: must be `b"IONC"`.
    pub magic: [u8; 4],

    /// Artifact format version.
    pub format_version: u32,

    /// Tool version that produced this artifact.
    pub tool_version: String,

    /// Canonical configuration string the cache key was derived from.
    pub canonical: String,

    /// XXH3-128 checksum of the compressed payload.
    pub checksum: u128,
}

/// Encodes records into a complete artifact file image.
pub fn encode(
    records: &[IonRecord],
    canonical: &str,
    tool_version: &str,
) -> Result<Vec<u8>, StoreError> {
    let raw = bincode::serde::encode_to_vec(records, bincode::config::standard())
        .map_err(serialization_error)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    encoder.write_all(&raw).map_err(serialization_error)?;
    let payload = encoder.finish().map_err(serialization_error)?;

    let header = ArtifactHeader {
        magic: ARTIFACT_MAGIC,
        format_version: ARTIFACT_FORMAT_VERSION,
        tool_version: tool_version.to_string(),
        canonical: canonical.to_string(),
        checksum: xxhash_rust::xxh3::xxh3_128(&payload),
    };
    let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
        .map_err(serialization_error)?;

    let header_len = header_bytes.len() as u32;
    let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
    output.extend_from_slice(&header_len.to_le_bytes());
    output.extend_from_slice(&header_bytes);
    output.extend_from_slice(&payload);
    Ok(output)
}

fn serialization_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Serialization {
        reason: e.to_string(),
    }
}

/// Decodes an artifact file image, validating its header.
///
/// Returns `None` if the header is truncated, the magic or format version
/// does not match, the checksum does not verify, or the payload does not
/// decode. This is fail-safe: corruption reads as a missing entry.
pub fn decode(raw: &[u8]) -> Option<(ArtifactHeader, Vec<IonRecord>)> {
    // Need at least 4 bytes for the header length
    if raw.len() < 4 {
        return None;
    }

    let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
    if raw.len() < 4 + header_len {
        return None;
    }

    let header: ArtifactHeader =
        bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
            .ok()?
            .0;

    if header.magic != ARTIFACT_MAGIC || header.format_version != ARTIFACT_FORMAT_VERSION {
        return None;
    }

    let payload = &raw[4 + header_len..];
    if xxhash_rust::xxh3::xxh3_128(payload) != header.checksum {
        return None;
    }

    let mut decoded = Vec::new();
    ZlibDecoder::new(payload).read_to_end(&mut decoded).ok()?;
    let records: Vec<IonRecord> =
        bincode::serde::decode_from_slice(&decoded, bincode::config::standard())
            .ok()?
            .0;
    Some((header, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> IonRecord {
        IonRecord {
            name: "Glucose".to_string(),
            mz: 203.052_609,
            charge: 1,
            adduct: "[M+Na]+".to_string(),
            isotope: None,
            formula: "C6H12O6(Na)(H-1)".to_string(),
        }
    }

    fn with_header(header: &ArtifactHeader, payload: &[u8]) -> Vec<u8> {
        let header_bytes =
            bincode::serde::encode_to_vec(header, bincode::config::standard()).unwrap();
        let mut output = Vec::new();
        output.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(payload);
        output
    }

    #[test]
    fn encode_then_decode_keeps_header_fields() {
        let raw = encode(&[record()], "Glucose|[M+Na]+|1||0", "0.1.0").unwrap();
        let (header, records) = decode(&raw).unwrap();
        assert_eq!(header.canonical, "Glucose|[M+Na]+|1||0");
        assert_eq!(header.tool_version, "0.1.0");
        assert_eq!(records, vec![record()]);
    }

    #[test]
    fn empty_record_list_is_encodable() {
        let raw = encode(&[], "x", "0.1.0").unwrap();
        let (_, records) = decode(&raw).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn truncated_input_returns_none() {
        assert!(decode(b"AB").is_none());
        assert!(decode(&[200, 0, 0, 0, 1, 2, 3]).is_none());
    }

    #[test]
    fn wrong_magic_returns_none() {
        let raw = encode(&[record()], "x", "0.1.0").unwrap();
        let (mut header, _) = decode(&raw).unwrap();
        let header_len = u32::from_le_bytes(raw[..4].try_into().unwrap()) as usize;
        header.magic = *b"BAAD";
        let tampered = with_header(&header, &raw[4 + header_len..]);
        assert!(decode(&tampered).is_none());
    }

    #[test]
    fn wrong_version_returns_none() {
        let raw = encode(&[record()], "x", "0.1.0").unwrap();
        let (mut header, _) = decode(&raw).unwrap();
        let header_len = u32::from_le_bytes(raw[..4].try_into().unwrap()) as usize;
        header.format_version = 999;
        let tampered = with_header(&header, &raw[4 + header_len..]);
        assert!(decode(&tampered).is_none());
    }

    #[test]
    fn checksum_mismatch_returns_none() {
        let mut raw = encode(&[record()], "x", "0.1.0").unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        assert!(decode(&raw).is_none());
    }
}
