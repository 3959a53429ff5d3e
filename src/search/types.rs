use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Document identifier shared by the index, the document store and the sharding function.
pub type DocId = u64;

/// One entry of a posting list: a document and how often the token occurs in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

/// Token frequencies of a query. Built by counting occurrences, order irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryVector {
    terms: HashMap<String, u32>,
}

impl QueryVector {
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut terms = HashMap::new();
        for token in tokens {
            *terms.entry(token).or_insert(0) += 1;
        }
        Self { terms }
    }

    pub fn frequency(&self, token: &str) -> u32 {
        self.terms.get(token).copied().unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.terms.contains_key(token)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.terms.iter().map(|(token, freq)| (token.as_str(), *freq))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Partial or merged relevance of one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// A stored document. Immutable once a document partition is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: DocId,
    pub url: String,
    pub title: String,
    pub text: String,
}

/// A ranked, resolved hit as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Outcome of one coordinated query.
///
/// `partial` is set whenever an index shard contributed nothing because it failed or
/// timed out, or a resolved result had to be dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub num_results: usize,
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub failed_index_shards: Vec<usize>,
    #[serde(default)]
    pub dropped_results: usize,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}
