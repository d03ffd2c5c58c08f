//! Loader: read the local JSON dataset (RFQs, vendor submissions, optional
//! params) and standalone parameter files. No network I/O; inputs are capped
//! at `MAX_INPUT_BYTES`.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rfq_core::{Params, Rfq, RfqId, VendorSubmission};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{looks_like_url_strict, IoError};

pub const MAX_INPUT_BYTES: u64 = 16 * 1024 * 1024;

/// Everything the engine reads from the dataset store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    pub rfqs: Vec<Rfq>,
    #[serde(default)]
    pub submissions: Vec<VendorSubmission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Dataset {
    pub fn rfq(&self, id: &RfqId) -> Option<&Rfq> {
        self.rfqs.iter().find(|r| &r.id == id)
    }

    /// Submissions addressed to `id`, in file order.
    pub fn submissions_for(&self, id: &RfqId) -> Vec<VendorSubmission> {
        self.submissions.iter().filter(|s| &s.rfq_id == id).cloned().collect()
    }
}

pub fn load_dataset(path: &Path) -> Result<Dataset, IoError> {
    let ds: Dataset = read_json_with_limits(path)?;

    let mut seen = BTreeSet::new();
    for r in &ds.rfqs {
        if !seen.insert(&r.id) {
            return Err(IoError::Invalid(format!("duplicate RFQ id {}", r.id)));
        }
    }

    tracing::debug!(
        path = %path.display(),
        rfqs = ds.rfqs.len(),
        submissions = ds.submissions.len(),
        "dataset loaded"
    );
    Ok(ds)
}

pub fn load_params(path: &Path) -> Result<Params, IoError> {
    read_json_with_limits(path)
}

fn read_json_with_limits<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let shown = path.display().to_string();
    if looks_like_url_strict(&shown) {
        return Err(IoError::Url(shown));
    }

    let f = File::open(path).map_err(|e| IoError::Path(format!("open {shown}: {e}")))?;
    let mut buf = Vec::new();
    f.take(MAX_INPUT_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| IoError::Path(format!("read {shown}: {e}")))?;
    if buf.len() as u64 > MAX_INPUT_BYTES {
        return Err(IoError::TooLarge { path: shown, limit: MAX_INPUT_BYTES });
    }

    serde_json::from_slice(&buf).map_err(|e| IoError::Json {
        source_name: shown,
        at: format!("line {}, column {}", e.line(), e.column()),
        msg: e.to_string(),
    })
}
