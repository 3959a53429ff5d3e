//! Document Shard Network Protocol
//!
//! The coordinator sends `(doc_id, raw query)` and receives the resolved result wrapped
//! as `{"results": [{doc_id, title, url, snippet}]}`. A request for a document the
//! shard does not own answers `409 Conflict` with an [`ErrorResponse`].

use crate::search::types::{DocId, SearchResult};
use serde::{Deserialize, Serialize};

pub use crate::server::ErrorResponse;

/// Resolve endpoint of a document shard.
pub const ENDPOINT_DOC: &str = "/doc";

#[derive(Debug, Serialize, Deserialize)]
pub struct DocQueryParams {
    pub id: DocId,
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocResponse {
    pub results: Vec<SearchResult>,
}
