//! Shard Clients
//!
//! The coordinator talks to shards through two traits so the same scatter-gather code
//! drives remote shards over HTTP and in-process services.

use crate::docstore::protocol::{DocResponse, ENDPOINT_DOC};
use crate::docstore::service::DocumentShardService;
use crate::error::{Result, SearchError, ShardKind};
use crate::index::protocol::{ENDPOINT_INDEX, IndexResponse};
use crate::index::service::IndexShardService;
use crate::search::types::{DocId, ScoredDoc, SearchResult};
use crate::storage::partitioner::DocumentSharder;

use async_trait::async_trait;
use std::net::SocketAddr;

/// Partial scoring against one index shard.
#[async_trait]
pub trait IndexShardClient: Send + Sync {
    async fn score(&self, query: &str) -> Result<Vec<ScoredDoc>>;
}

/// Resolution of one document on the document shard that owns it.
#[async_trait]
pub trait DocumentShardClient: Send + Sync {
    async fn resolve(&self, doc_id: DocId, query: &str) -> Result<SearchResult>;
}

#[async_trait]
impl IndexShardClient for IndexShardService {
    async fn score(&self, query: &str) -> Result<Vec<ScoredDoc>> {
        Ok(self.score_query(query))
    }
}

#[async_trait]
impl DocumentShardClient for DocumentShardService {
    async fn resolve(&self, doc_id: DocId, query: &str) -> Result<SearchResult> {
        DocumentShardService::resolve(self, doc_id, query)
    }
}

/// Index shard reached over HTTP.
pub struct HttpIndexShard {
    shard: usize,
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpIndexShard {
    pub fn new(shard: usize, addr: SocketAddr, http_client: reqwest::Client) -> Self {
        Self {
            shard,
            base_url: format!("http://{}", addr),
            http_client,
        }
    }

    fn unreachable(&self, reason: impl ToString) -> SearchError {
        SearchError::ShardUnreachable {
            kind: ShardKind::Index,
            shard: self.shard,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl IndexShardClient for HttpIndexShard {
    async fn score(&self, query: &str) -> Result<Vec<ScoredDoc>> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, ENDPOINT_INDEX))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        if !response.status().is_success() {
            return Err(self.unreachable(format!("status {}", response.status())));
        }

        let body: IndexResponse = response.json().await.map_err(|e| self.unreachable(e))?;
        Ok(body.into_scored())
    }
}

/// Document shard reached over HTTP.
pub struct HttpDocumentShard {
    shard: usize,
    base_url: String,
    sharder: DocumentSharder,
    http_client: reqwest::Client,
}

impl HttpDocumentShard {
    pub fn new(
        shard: usize,
        addr: SocketAddr,
        sharder: DocumentSharder,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            shard,
            base_url: format!("http://{}", addr),
            sharder,
            http_client,
        }
    }

    fn unreachable(&self, reason: impl ToString) -> SearchError {
        SearchError::ShardUnreachable {
            kind: ShardKind::Document,
            shard: self.shard,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl DocumentShardClient for HttpDocumentShard {
    async fn resolve(&self, doc_id: DocId, query: &str) -> Result<SearchResult> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, ENDPOINT_DOC))
            .query(&[("id", doc_id.to_string().as_str()), ("q", query)])
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(SearchError::ShardDataInconsistency {
                doc_id,
                shard: self.shard,
                owner: self.sharder.shard(doc_id),
            });
        }
        if !response.status().is_success() {
            return Err(self.unreachable(format!("status {}", response.status())));
        }

        let body: DocResponse = response.json().await.map_err(|e| self.unreachable(e))?;
        body.results
            .into_iter()
            .next()
            .ok_or_else(|| self.unreachable("empty resolve response"))
    }
}
