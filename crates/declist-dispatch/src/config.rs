//! Dispatch configuration.

use serde::{Deserialize, Serialize};

/// Tuning for batch flattening and submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Threads used to flatten lists. Output order never depends on it.
    pub flatten_workers: usize,
    /// Reject batches with more nodes than this before submission.
    pub max_batch_nodes: Option<usize>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            flatten_workers: 1,
            max_batch_nodes: None,
        }
    }
}

impl DispatchConfig {
    /// Parse a JSON object; absent fields take their defaults.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
