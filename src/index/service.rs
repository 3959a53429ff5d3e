use super::store::IndexPartition;
use crate::search::tokenizer::Tokenizer;
use crate::search::types::{DocId, QueryVector, ScoredDoc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Answers partial scoring requests against one index partition.
pub struct IndexShardService {
    partition: Arc<IndexPartition>,
    tokenizer: Tokenizer,
}

impl IndexShardService {
    pub fn new(partition: Arc<IndexPartition>, tokenizer: Tokenizer) -> Self {
        Self {
            partition,
            tokenizer,
        }
    }

    pub fn shard_id(&self) -> usize {
        self.partition.shard_id()
    }

    /// Scores every local document sharing at least one token with `query`.
    ///
    /// An empty or token-less query scores to an empty list.
    pub fn score_query(&self, query: &str) -> Vec<ScoredDoc> {
        let query_vector = self.tokenizer.query_vector(query);
        if query_vector.is_empty() {
            tracing::debug!("Index shard {}: query {:?} has no tokens", self.shard_id(), query);
            return Vec::new();
        }
        self.score_vector(&query_vector)
    }

    /// Dot product of each touched document against the query vector.
    ///
    /// Keeps one running product per document instead of rebuilding document vectors.
    /// Accumulation is in integers so the result does not depend on token order.
    /// Output is ascending by doc id.
    pub fn score_vector(&self, query_vector: &QueryVector) -> Vec<ScoredDoc> {
        let mut scores: BTreeMap<DocId, u64> = BTreeMap::new();

        for (token, query_freq) in query_vector.iter() {
            for posting in self.partition.postings(token) {
                *scores.entry(posting.doc_id).or_insert(0) +=
                    u64::from(query_freq) * u64::from(posting.term_frequency);
            }
        }

        tracing::debug!(
            "Index shard {} scored {} documents for {} tokens",
            self.shard_id(),
            scores.len(),
            query_vector.len()
        );

        scores
            .into_iter()
            .map(|(doc_id, score)| ScoredDoc {
                doc_id,
                score: score as f64,
            })
            .collect()
    }
}
