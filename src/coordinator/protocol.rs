//! Frontend Network Protocol
//!
//! Callers send a raw query and an optional result count; the answer is a
//! [`SearchResponse`](crate::search::types::SearchResponse).

use serde::{Deserialize, Serialize};

/// Public search endpoint of the coordinator.
pub const ENDPOINT_SEARCH: &str = "/search";

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Result count for this request; the configured default applies when absent or 0.
    pub k: Option<usize>,
}
