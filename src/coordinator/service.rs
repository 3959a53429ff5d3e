//! Query Coordinator
//!
//! Executes one query in two fan-out phases:
//!
//! 1. **Scatter**: the raw query goes to every index shard concurrently.
//! 2. **Merge**: partial scores are summed per document and ranked.
//! 3. **Route**: each of the top-K doc ids is resolved on `shard(doc_id)`, concurrently,
//!    one call per document.
//! 4. **Assemble**: resolved results are returned in ranking order.
//!
//! Every shard call is bounded by the same timeout. A timed-out call is handled exactly
//! like a failed one.

use super::client::{DocumentShardClient, HttpDocumentShard, HttpIndexShard, IndexShardClient};
use super::engine::{merge_partials, rank};
use crate::config::ClusterConfig;
use crate::error::{Result, SearchError, ShardKind};
use crate::search::types::{ScoredDoc, SearchResponse, SearchResult};
use crate::storage::partitioner::DocumentSharder;

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct QueryCoordinator {
    index_shards: Vec<Arc<dyn IndexShardClient>>,
    /// Position in this list is the document shard id.
    document_shards: Vec<Arc<dyn DocumentShardClient>>,
    sharder: DocumentSharder,
    default_top_k: usize,
    shard_timeout: Duration,
}

impl QueryCoordinator {
    /// The position of each document client is its shard id and the list length is the
    /// modulus of the sharding function, so the list must not be empty.
    pub fn new(
        index_shards: Vec<Arc<dyn IndexShardClient>>,
        document_shards: Vec<Arc<dyn DocumentShardClient>>,
        default_top_k: usize,
        shard_timeout: Duration,
    ) -> Result<Self> {
        if document_shards.is_empty() {
            return Err(SearchError::Config(
                "at least one document shard is required".into(),
            ));
        }
        let sharder = DocumentSharder::new(document_shards.len());
        Ok(Self {
            index_shards,
            document_shards,
            sharder,
            default_top_k,
            shard_timeout,
        })
    }

    /// Coordinator over the HTTP shards listed in `config`.
    pub fn from_config(config: &ClusterConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(config.shard_timeout())
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {}", e)))?;
        let sharder = DocumentSharder::new(config.document_shards.len());

        let index_shards = config
            .index_shards
            .iter()
            .enumerate()
            .map(|(shard, endpoint)| {
                Arc::new(HttpIndexShard::new(shard, endpoint.addr, http_client.clone()))
                    as Arc<dyn IndexShardClient>
            })
            .collect();

        let document_shards = config
            .document_shards
            .iter()
            .enumerate()
            .map(|(shard, endpoint)| {
                Arc::new(HttpDocumentShard::new(
                    shard,
                    endpoint.addr,
                    sharder,
                    http_client.clone(),
                )) as Arc<dyn DocumentShardClient>
            })
            .collect();

        Self::new(
            index_shards,
            document_shards,
            config.top_k,
            config.shard_timeout(),
        )
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    /// Runs the full scatter, merge, route and assemble pipeline for one query.
    ///
    /// # Errors
    ///
    /// Only [`SearchError::ShardDataInconsistency`] escapes: unreachable or slow shards
    /// degrade the response (`partial = true`) instead of failing it.
    pub async fn search(&self, query: &str, top_k: Option<usize>) -> Result<SearchResponse> {
        let top_k = top_k.filter(|&k| k > 0).unwrap_or(self.default_top_k);
        let query_id = Uuid::new_v4();

        if query.trim().is_empty() {
            tracing::debug!(%query_id, "empty query, returning no results");
            return Ok(SearchResponse::empty());
        }

        tracing::info!(%query_id, query, top_k, "search started");

        let (partials, failed_index_shards) = self.scatter(query_id, query).await;
        let ranked = rank(merge_partials(&partials), top_k);
        let (results, dropped_results) = self.resolve_ranked(query_id, &ranked, query).await?;

        let partial = !failed_index_shards.is_empty() || dropped_results > 0;
        if partial {
            tracing::warn!(
                %query_id,
                failed_index_shards = ?failed_index_shards,
                dropped_results,
                "returning partial results"
            );
        }
        tracing::info!(%query_id, num_results = results.len(), "search finished");

        Ok(SearchResponse {
            num_results: results.len(),
            results,
            partial,
            failed_index_shards,
            dropped_results,
        })
    }

    /// Sends `query` to every index shard and waits for all of them.
    ///
    /// Returns the partial score lists of the shards that answered and the ids of the
    /// shards that failed or timed out.
    async fn scatter(&self, query_id: Uuid, query: &str) -> (Vec<Vec<ScoredDoc>>, Vec<usize>) {
        let calls = self.index_shards.iter().enumerate().map(|(shard, client)| {
            let call = self.bounded(ShardKind::Index, shard, client.score(query));
            async move { (shard, call.await) }
        });

        let mut partials = Vec::with_capacity(self.index_shards.len());
        let mut failed = Vec::new();
        for (shard, outcome) in join_all(calls).await {
            match outcome {
                Ok(scored) => {
                    tracing::debug!(%query_id, shard, count = scored.len(), "index shard answered");
                    partials.push(scored);
                }
                Err(e) => {
                    tracing::warn!(%query_id, shard, error = %e, "index shard failed, its postings are missing");
                    failed.push(shard);
                }
            }
        }
        (partials, failed)
    }

    /// Resolves every ranked doc id on its owning document shard.
    ///
    /// Output keeps the ranking order. Transient failures drop the affected result and
    /// are counted; a topology mismatch aborts the query.
    async fn resolve_ranked(
        &self,
        query_id: Uuid,
        ranked: &[ScoredDoc],
        query: &str,
    ) -> Result<(Vec<SearchResult>, usize)> {
        let calls = ranked.iter().map(|doc| {
            let shard = self.sharder.shard(doc.doc_id);
            let client = &self.document_shards[shard];
            let call = self.bounded(ShardKind::Document, shard, client.resolve(doc.doc_id, query));
            async move { (doc.doc_id, shard, call.await) }
        });

        let mut results = Vec::with_capacity(ranked.len());
        let mut dropped = 0;
        for (doc_id, shard, outcome) in join_all(calls).await {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) if !e.is_transient() => {
                    tracing::error!(%query_id, doc_id, shard, error = %e, "resolve failed, aborting query");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(%query_id, doc_id, shard, error = %e, "dropping unresolved result");
                    dropped += 1;
                }
            }
        }
        Ok((results, dropped))
    }

    /// Applies the per-call timeout, reporting expiry as an unreachable shard.
    async fn bounded<T>(
        &self,
        kind: ShardKind,
        shard: usize,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.shard_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SearchError::ShardUnreachable {
                kind,
                shard,
                reason: format!("timed out after {}ms", self.shard_timeout.as_millis()),
            }),
        }
    }
}
