use geotrail_kernel::Sample;
use serde::{Deserialize, Serialize};

/// Persisted state of one identity: the ledger snapshot and the pending queue.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimelineDocument {
    pub identity: String,
    /// Unix seconds at save time.
    pub saved_at: u64,
    pub timeline: Vec<Sample>,
    #[serde(default)]
    pub pending: Vec<Sample>,
}

impl TimelineDocument {
    pub fn new(identity: impl Into<String>, timeline: Vec<Sample>, pending: Vec<Sample>) -> Self {
        Self {
            identity: identity.into(),
            saved_at: now_secs(),
            timeline,
            pending,
        }
    }
}

pub(crate) fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
