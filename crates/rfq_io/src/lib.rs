//! The engine's only filesystem surface.
//!
//! - `loader`: local JSON dataset (RFQs + submissions + optional params) and
//!   standalone parameter files; offline only, size-capped.
//! - `canonical_json`: sorted-key compact JSON and atomic temp+rename writes.
//! - `hasher`: SHA-256 hex digests and export ids.

#![forbid(unsafe_code)]

use thiserror::Error;

pub mod canonical_json;
pub mod hasher;
pub mod loader;

pub use canonical_json::{to_canonical_bytes, to_canonical_json_bytes, write_bytes_atomic, write_canonical_file};
pub use hasher::{export_id, sha256_canonical, sha256_hex};
pub use loader::{load_dataset, load_params, Dataset, MAX_INPUT_BYTES};

/// Unified error for rfq_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync).
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON parse or shape errors, located where serde_json can tell.
    #[error("json error in {source_name} at {at}: {msg}")]
    Json { source_name: String, at: String, msg: String },

    /// Inputs are local files only.
    #[error("remote inputs are not supported: {0}")]
    Url(String),

    #[error("{path} exceeds the {limit} byte input limit")]
    TooLarge { path: String, limit: u64 },

    /// Well-formed JSON that breaks a dataset invariant.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            source_name: "<value>".to_string(),
            at: format!("line {}, column {}", e.line(), e.column()),
            msg: e.to_string(),
        }
    }
}

/// True if `s` looks like a URL (any `<scheme>://`, including `file://`).
#[inline]
pub fn looks_like_url_strict(s: &str) -> bool {
    s.trim().contains("://")
}
