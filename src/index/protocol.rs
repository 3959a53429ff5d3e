//! Index Shard Network Protocol
//!
//! The coordinator sends the raw query string and receives `(doc_id, score)` pairs,
//! serialized as `{"postings": [[doc_id, score], ...]}`.

use crate::search::types::{DocId, ScoredDoc};
use serde::{Deserialize, Serialize};

/// Partial scoring endpoint of an index shard.
pub const ENDPOINT_INDEX: &str = "/index";

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexQueryParams {
    /// Raw query string. A missing `q` is treated as an empty query.
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub postings: Vec<(DocId, f64)>,
}

impl IndexResponse {
    pub fn from_scored(scored: Vec<ScoredDoc>) -> Self {
        Self {
            postings: scored.into_iter().map(|doc| (doc.doc_id, doc.score)).collect(),
        }
    }

    pub fn into_scored(self) -> Vec<ScoredDoc> {
        self.postings
            .into_iter()
            .map(|(doc_id, score)| ScoredDoc { doc_id, score })
            .collect()
    }
}
