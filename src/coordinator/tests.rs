//! Coordinator Module Tests
//!
//! Runs the scatter-gather pipeline against small clusters.
//!
//! ## Test Scopes
//! - **Ranking**: End-to-end ordering, top-K truncation, empty and unmatched queries.
//! - **Failures**: Failed and slow index shards, slow or unresolved documents, sharding
//!   mismatch, construction without document shards.
//! - **HTTP**: The same pipeline over real listeners, including the frontend endpoint.

#[cfg(test)]
mod tests {
    use crate::coordinator::client::{
        DocumentShardClient, HttpDocumentShard, HttpIndexShard, IndexShardClient,
    };
    use crate::coordinator::handlers as frontend_handlers;
    use crate::coordinator::service::QueryCoordinator;
    use crate::docstore::handlers as doc_handlers;
    use crate::docstore::service::DocumentShardService;
    use crate::docstore::store::DocumentPartition;
    use crate::error::{Result, SearchError, ShardKind};
    use crate::index::handlers as index_handlers;
    use crate::index::service::IndexShardService;
    use crate::index::store::IndexPartition;
    use crate::search::snippet::SnippetConfig;
    use crate::search::tokenizer::Tokenizer;
    use crate::search::types::{DocId, DocumentRecord, Posting, ScoredDoc, SearchResponse, SearchResult};
    use crate::storage::partitioner::DocumentSharder;

    use async_trait::async_trait;
    use axum::Router;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_millis(200);

    fn posting(doc_id: u64, term_frequency: u32) -> Posting {
        Posting {
            doc_id,
            term_frequency,
        }
    }

    fn record(doc_id: u64, text: &str) -> DocumentRecord {
        DocumentRecord {
            doc_id,
            url: format!("http://example.com/{}", doc_id),
            title: format!("Doc {}", doc_id),
            text: text.to_string(),
        }
    }

    /// Two index shards split by token: shard 0 holds "cat", shard 1 holds "dog".
    fn index_services() -> Vec<Arc<IndexShardService>> {
        let cat = HashMap::from([("cat".to_string(), vec![posting(1, 2), posting(2, 1)])]);
        let dog = HashMap::from([("dog".to_string(), vec![posting(2, 3)])]);
        vec![
            Arc::new(IndexShardService::new(
                Arc::new(IndexPartition::new(0, 2, cat)),
                Tokenizer::default(),
            )),
            Arc::new(IndexShardService::new(
                Arc::new(IndexPartition::new(1, 2, dog)),
                Tokenizer::default(),
            )),
        ]
    }

    /// Two document shards: doc 2 on shard 0, doc 1 on shard 1.
    fn document_services() -> Vec<Arc<DocumentShardService>> {
        let shard0 = DocumentPartition::new(0, 2, vec![record(2, "cat dog dog dog")]);
        let shard1 = DocumentPartition::new(1, 2, vec![record(1, "cat cat")]);
        [shard0, shard1]
            .into_iter()
            .map(|partition| {
                Arc::new(DocumentShardService::new(
                    Arc::new(partition),
                    Tokenizer::default(),
                    SnippetConfig::default(),
                ))
            })
            .collect()
    }

    fn index_clients() -> Vec<Arc<dyn IndexShardClient>> {
        index_services()
            .into_iter()
            .map(|service| service as Arc<dyn IndexShardClient>)
            .collect()
    }

    fn document_clients() -> Vec<Arc<dyn DocumentShardClient>> {
        document_services()
            .into_iter()
            .map(|service| service as Arc<dyn DocumentShardClient>)
            .collect()
    }

    fn coordinator() -> QueryCoordinator {
        QueryCoordinator::new(index_clients(), document_clients(), 10, TIMEOUT).unwrap()
    }

    fn ids(response: &SearchResponse) -> Vec<DocId> {
        response.results.iter().map(|r| r.doc_id).collect()
    }

    struct FailingIndexShard(usize);

    #[async_trait]
    impl IndexShardClient for FailingIndexShard {
        async fn score(&self, _query: &str) -> Result<Vec<ScoredDoc>> {
            Err(SearchError::ShardUnreachable {
                kind: ShardKind::Index,
                shard: self.0,
                reason: "connection refused".to_string(),
            })
        }
    }

    struct SlowIndexShard {
        inner: Arc<IndexShardService>,
        delay: Duration,
    }

    #[async_trait]
    impl IndexShardClient for SlowIndexShard {
        async fn score(&self, query: &str) -> Result<Vec<ScoredDoc>> {
            tokio::time::sleep(self.delay).await;
            self.inner.score(query).await
        }
    }

    /// Replays fixed partial scores.
    struct FixedIndexShard(Vec<ScoredDoc>);

    #[async_trait]
    impl IndexShardClient for FixedIndexShard {
        async fn score(&self, _query: &str) -> Result<Vec<ScoredDoc>> {
            Ok(self.0.clone())
        }
    }

    struct FailingDocumentShard {
        shard: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentShardClient for FailingDocumentShard {
        async fn resolve(&self, _doc_id: DocId, _query: &str) -> Result<SearchResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SearchError::ShardUnreachable {
                kind: ShardKind::Document,
                shard: self.shard,
                reason: "connection reset".to_string(),
            })
        }
    }

    /// Delays the resolve of one doc id and forwards everything to `inner`.
    struct SlowDocumentShard {
        inner: Arc<DocumentShardService>,
        slow_doc: DocId,
        delay: Duration,
    }

    #[async_trait]
    impl DocumentShardClient for SlowDocumentShard {
        async fn resolve(&self, doc_id: DocId, query: &str) -> Result<SearchResult> {
            if doc_id == self.slow_doc {
                tokio::time::sleep(self.delay).await;
            }
            DocumentShardClient::resolve(self.inner.as_ref(), doc_id, query).await
        }
    }

    // ============================================================
    // RANKING TESTS
    // ============================================================

    #[tokio::test]
    async fn test_cat_dog_ranks_doc2_first() {
        let response = coordinator().search("cat dog", Some(10)).await.unwrap();

        assert_eq!(ids(&response), vec![2, 1]);
        assert_eq!(response.num_results, 2);
        assert!(!response.partial);
        assert!(response.failed_index_shards.is_empty());
        assert_eq!(response.dropped_results, 0);
        assert_eq!(response.results[0].title, "Doc 2");
        assert_eq!(response.results[1].url, "http://example.com/1");
        assert!(!response.results[0].snippet.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_truncates() {
        let response = coordinator().search("cat dog", Some(1)).await.unwrap();
        assert_eq!(ids(&response), vec![2]);
        assert_eq!(response.num_results, 1);
    }

    #[tokio::test]
    async fn test_top_k_larger_than_matches() {
        let response = coordinator().search("cat", Some(50)).await.unwrap();
        assert_eq!(response.num_results, 2);
    }

    #[tokio::test]
    async fn test_missing_or_zero_top_k_uses_default() {
        let coordinator = QueryCoordinator::new(index_clients(), document_clients(), 1, TIMEOUT).unwrap();

        assert_eq!(coordinator.search("cat dog", None).await.unwrap().num_results, 1);
        assert_eq!(coordinator.search("cat dog", Some(0)).await.unwrap().num_results, 1);
        assert_eq!(coordinator.default_top_k(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_query_returns_nothing() {
        let response = coordinator().search("zebra", None).await.unwrap();
        assert_eq!(response, SearchResponse::empty());
    }

    #[tokio::test]
    async fn test_blank_query_returns_nothing() {
        let response = coordinator().search("   ", None).await.unwrap();
        assert_eq!(response.num_results, 0);
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_query_is_identical() {
        let coordinator = coordinator();
        let first = coordinator.search("dog cat cat", None).await.unwrap();
        let second = coordinator.search("dog cat cat", None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_index_shard_order_does_not_change_ranking() {
        let partials = [
            vec![ScoredDoc { doc_id: 4, score: 0.1 }, ScoredDoc { doc_id: 2, score: 0.3 }],
            vec![ScoredDoc { doc_id: 4, score: 0.2 }],
            vec![ScoredDoc { doc_id: 2, score: 0.0 }, ScoredDoc { doc_id: 4, score: 0.05 }],
        ];
        let docs = vec![
            DocumentPartition::new(0, 1, vec![record(2, "a"), record(4, "b")]),
        ];
        let doc_clients = || -> Vec<Arc<dyn DocumentShardClient>> {
            docs.iter()
                .cloned()
                .map(|partition| {
                    Arc::new(DocumentShardService::new(
                        Arc::new(partition),
                        Tokenizer::default(),
                        SnippetConfig::default(),
                    )) as Arc<dyn DocumentShardClient>
                })
                .collect()
        };

        let mut responses = Vec::new();
        for order in [[0, 1, 2], [2, 0, 1], [1, 2, 0]] {
            let index: Vec<Arc<dyn IndexShardClient>> = order
                .iter()
                .map(|&i| Arc::new(FixedIndexShard(partials[i].clone())) as Arc<dyn IndexShardClient>)
                .collect();
            let coordinator = QueryCoordinator::new(index, doc_clients(), 10, TIMEOUT).unwrap();
            responses.push(coordinator.search("anything", None).await.unwrap());
        }

        assert_eq!(ids(&responses[0]), vec![4, 2]);
        assert_eq!(responses[0], responses[1]);
        assert_eq!(responses[1], responses[2]);
    }

    // ============================================================
    // FAILURE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_failed_index_shard_marks_partial() {
        let mut index = index_clients();
        index[1] = Arc::new(FailingIndexShard(1));
        let coordinator = QueryCoordinator::new(index, document_clients(), 10, TIMEOUT).unwrap();

        let response = coordinator.search("cat dog", None).await.unwrap();

        // Only "cat" postings survive: doc1 = 2, doc2 = 1
        assert_eq!(ids(&response), vec![1, 2]);
        assert!(response.partial);
        assert_eq!(response.failed_index_shards, vec![1]);
    }

    #[tokio::test]
    async fn test_slow_index_shard_times_out() {
        let services = index_services();
        let index: Vec<Arc<dyn IndexShardClient>> = vec![
            services[0].clone(),
            Arc::new(SlowIndexShard {
                inner: services[1].clone(),
                delay: Duration::from_secs(5),
            }),
        ];
        let coordinator =
            QueryCoordinator::new(index, document_clients(), 10, Duration::from_millis(50)).unwrap();

        let response = coordinator.search("cat dog", None).await.unwrap();

        assert!(response.partial);
        assert_eq!(response.failed_index_shards, vec![1]);
        assert_eq!(ids(&response), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_all_index_shards_failing_gives_empty_partial() {
        let index: Vec<Arc<dyn IndexShardClient>> =
            vec![Arc::new(FailingIndexShard(0)), Arc::new(FailingIndexShard(1))];
        let coordinator = QueryCoordinator::new(index, document_clients(), 10, TIMEOUT).unwrap();

        let response = coordinator.search("cat", None).await.unwrap();

        assert_eq!(response.num_results, 0);
        assert!(response.partial);
        assert_eq!(response.failed_index_shards, vec![0, 1]);
    }

    #[tokio::test]
    async fn test_unresolved_documents_are_dropped() {
        let failing = Arc::new(FailingDocumentShard {
            shard: 1,
            calls: AtomicUsize::new(0),
        });
        let mut docs = document_clients();
        docs[1] = failing.clone();
        let coordinator = QueryCoordinator::new(index_clients(), docs, 10, TIMEOUT).unwrap();

        let response = coordinator.search("cat dog", None).await.unwrap();

        assert_eq!(ids(&response), vec![2]);
        assert_eq!(response.dropped_results, 1);
        assert!(response.partial);
        assert!(response.failed_index_shards.is_empty());
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1, "one call per routed doc");
    }

    #[tokio::test]
    async fn test_sharding_mismatch_fails_query() {
        // Document shards listed in the wrong order: shard(2) = 0 lands on the shard 1 data.
        let mut docs = document_clients();
        docs.reverse();
        let coordinator = QueryCoordinator::new(index_clients(), docs, 10, TIMEOUT).unwrap();

        let result = coordinator.search("dog", None).await;

        match result {
            Err(SearchError::ShardDataInconsistency { doc_id, owner, .. }) => {
                assert_eq!(doc_id, 2);
                assert_eq!(owner, 0);
            }
            other => panic!("expected inconsistency, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_document_shard_drops_result() {
        let index: Vec<Arc<dyn IndexShardClient>> = vec![Arc::new(FixedIndexShard(vec![
            ScoredDoc { doc_id: 1, score: 3.0 },
            ScoredDoc { doc_id: 2, score: 2.0 },
            ScoredDoc { doc_id: 3, score: 1.0 },
        ]))];
        let partition = DocumentPartition::new(
            0,
            1,
            vec![record(1, "cat"), record(2, "cat"), record(3, "cat")],
        );
        let docs: Vec<Arc<dyn DocumentShardClient>> = vec![Arc::new(SlowDocumentShard {
            inner: Arc::new(DocumentShardService::new(
                Arc::new(partition),
                Tokenizer::default(),
                SnippetConfig::default(),
            )),
            slow_doc: 2,
            delay: Duration::from_secs(5),
        })];
        let coordinator =
            QueryCoordinator::new(index, docs, 10, Duration::from_millis(50)).unwrap();

        let response = coordinator.search("cat", None).await.unwrap();

        assert_eq!(ids(&response), vec![1, 3]);
        assert_eq!(response.num_results, 2);
        assert_eq!(response.dropped_results, 1);
        assert!(response.partial);
        assert!(response.failed_index_shards.is_empty());
    }

    #[test]
    fn test_coordinator_requires_document_shards() {
        let result = QueryCoordinator::new(index_clients(), Vec::new(), 10, TIMEOUT);
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    // ============================================================
    // HTTP TESTS
    // ============================================================

    async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    async fn http_coordinator(swap_document_shards: bool) -> QueryCoordinator {
        let http_client = reqwest::Client::new();

        let mut index: Vec<Arc<dyn IndexShardClient>> = Vec::new();
        for (shard, service) in index_services().into_iter().enumerate() {
            let addr = spawn(index_handlers::router(service)).await;
            index.push(Arc::new(HttpIndexShard::new(shard, addr, http_client.clone())));
        }

        let mut addrs = Vec::new();
        for service in document_services() {
            addrs.push(spawn(doc_handlers::router(service)).await);
        }
        if swap_document_shards {
            addrs.reverse();
        }
        let sharder = DocumentSharder::new(addrs.len());
        let docs: Vec<Arc<dyn DocumentShardClient>> = addrs
            .into_iter()
            .enumerate()
            .map(|(shard, addr)| {
                Arc::new(HttpDocumentShard::new(shard, addr, sharder, http_client.clone()))
                    as Arc<dyn DocumentShardClient>
            })
            .collect();

        QueryCoordinator::new(index, docs, 10, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_http_cluster_matches_in_process() {
        let over_http = http_coordinator(false).await.search("cat dog", None).await.unwrap();
        let in_process = coordinator().search("cat dog", None).await.unwrap();

        assert_eq!(over_http, in_process);
        assert_eq!(ids(&over_http), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_http_conflict_maps_to_inconsistency() {
        let result = http_coordinator(true).await.search("cat dog", None).await;
        assert!(matches!(result, Err(SearchError::ShardDataInconsistency { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_http_shard_marks_partial() {
        // Bind then drop to get a port nobody listens on.
        let dead = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let mut index = index_clients();
        index[0] = Arc::new(HttpIndexShard::new(0, dead, reqwest::Client::new()));
        let coordinator = QueryCoordinator::new(index, document_clients(), 10, TIMEOUT).unwrap();

        let response = coordinator.search("cat dog", None).await.unwrap();

        assert_eq!(ids(&response), vec![2]);
        assert_eq!(response.failed_index_shards, vec![0]);
    }

    #[tokio::test]
    async fn test_frontend_search_endpoint() {
        let frontend = spawn(frontend_handlers::router(Arc::new(coordinator()))).await;

        let response: SearchResponse = reqwest::Client::new()
            .get(format!("http://{}/search", frontend))
            .query(&[("q", "cat dog"), ("k", "1")])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(ids(&response), vec![2]);
    }

    #[tokio::test]
    async fn test_frontend_reports_inconsistency_as_server_error() {
        let mut docs = document_clients();
        docs.reverse();
        let coordinator = QueryCoordinator::new(index_clients(), docs, 10, TIMEOUT).unwrap();
        let frontend = spawn(frontend_handlers::router(Arc::new(coordinator))).await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/search?q=dog", frontend))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
