//! SHA-256 digests over raw bytes and canonical JSON, plus export ids.
//!
//! Hex digests are lowercase. Use `sha256_canonical` for values (goes through
//! `canonical_json`), `sha256_hex` for raw bytes.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

/// Prefix of comparison export ids.
pub const EXPORT_ID_PREFIX: &str = "CMP:";

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of `value`.
pub fn sha256_canonical<T: Serialize + ?Sized>(value: &T) -> Result<String, IoError> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// `CMP:<hex>` id of an exported comparison document.
pub fn export_id<T: Serialize + ?Sized>(value: &T) -> Result<String, IoError> {
    Ok(format!("{EXPORT_ID_PREFIX}{}", sha256_canonical(value)?))
}
