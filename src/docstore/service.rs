use super::store::DocumentPartition;
use crate::error::{Result, SearchError};
use crate::search::snippet::{SnippetConfig, make_snippet};
use crate::search::tokenizer::Tokenizer;
use crate::search::types::{DocId, SearchResult};
use crate::storage::partitioner::DocumentSharder;
use std::sync::Arc;

/// Resolves ranked doc ids to titles, urls and snippets for one document shard.
pub struct DocumentShardService {
    partition: Arc<DocumentPartition>,
    sharder: DocumentSharder,
    tokenizer: Tokenizer,
    snippet: SnippetConfig,
}

impl DocumentShardService {
    pub fn new(partition: Arc<DocumentPartition>, tokenizer: Tokenizer, snippet: SnippetConfig) -> Self {
        let sharder = DocumentSharder::new(partition.num_shards());
        Self {
            partition,
            sharder,
            tokenizer,
            snippet,
        }
    }

    pub fn shard_id(&self) -> usize {
        self.partition.shard_id()
    }

    /// Looks up `doc_id` and builds its snippet for `query`.
    ///
    /// A doc id this shard does not hold is never a miss: the coordinator routed it
    /// here through the sharding function, so the topology is broken.
    pub fn resolve(&self, doc_id: DocId, query: &str) -> Result<SearchResult> {
        let shard = self.shard_id();
        let owner = self.sharder.shard(doc_id);

        let record = match self.partition.get(doc_id) {
            Some(record) if owner == shard => record,
            _ => {
                if owner == shard {
                    tracing::error!("Document shard {} does not hold its own doc {}", shard, doc_id);
                } else {
                    tracing::error!(
                        "Document shard {} asked for doc {} owned by shard {}: sharding mismatch",
                        shard,
                        doc_id,
                        owner
                    );
                }
                return Err(SearchError::ShardDataInconsistency {
                    doc_id,
                    shard,
                    owner,
                });
            }
        };

        let query_vector = self.tokenizer.query_vector(query);
        let snippet = make_snippet(&record.text, &query_vector, &self.tokenizer, &self.snippet);

        Ok(SearchResult {
            doc_id,
            title: record.title.clone(),
            url: record.url.clone(),
            snippet,
        })
    }
}
