//! Role Bootstrap
//!
//! Starts one role of the cluster from the static configuration. Each shard is an
//! independent process reachable by its configured address; [`run_all`] starts every
//! listener of the configuration inside one runtime for single-host deployments.

use crate::config::ClusterConfig;
use crate::coordinator::handlers as frontend_handlers;
use crate::coordinator::service::QueryCoordinator;
use crate::docstore::handlers as doc_handlers;
use crate::docstore::service::DocumentShardService;
use crate::docstore::store::DocumentPartition;
use crate::index::handlers as index_handlers;
use crate::index::service::IndexShardService;
use crate::index::store::IndexPartition;
use crate::server::serve;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Loads the partition of index shard `shard` and wraps it in a service.
pub fn index_service(config: &ClusterConfig, shard: usize) -> Result<Arc<IndexShardService>> {
    let endpoint = config
        .index_shards
        .get(shard)
        .with_context(|| format!("no index shard {} in config", shard))?;
    let partition = IndexPartition::open(&endpoint.partition, shard, config.index_shards.len())
        .with_context(|| format!("failed to load index shard {}", shard))?;
    Ok(Arc::new(IndexShardService::new(
        Arc::new(partition),
        config.tokenizer.clone(),
    )))
}

/// Loads the partition of document shard `shard` and wraps it in a service.
pub fn document_service(config: &ClusterConfig, shard: usize) -> Result<Arc<DocumentShardService>> {
    let endpoint = config
        .document_shards
        .get(shard)
        .with_context(|| format!("no document shard {} in config", shard))?;
    let partition =
        DocumentPartition::open(&endpoint.partition, shard, config.document_shards.len())
            .with_context(|| format!("failed to load document shard {}", shard))?;
    Ok(Arc::new(DocumentShardService::new(
        Arc::new(partition),
        config.tokenizer.clone(),
        config.snippet.clone(),
    )))
}

pub async fn run_index_shard(config: &ClusterConfig, shard: usize) -> Result<()> {
    let service = index_service(config, shard)?;
    let addr = config.index_shards[shard].addr;
    serve(addr, index_handlers::router(service), &format!("Index shard {}", shard)).await?;
    Ok(())
}

pub async fn run_document_shard(config: &ClusterConfig, shard: usize) -> Result<()> {
    let service = document_service(config, shard)?;
    let addr = config.document_shards[shard].addr;
    serve(addr, doc_handlers::router(service), &format!("Document shard {}", shard)).await?;
    Ok(())
}

pub async fn run_frontend(config: &ClusterConfig) -> Result<()> {
    let coordinator = Arc::new(QueryCoordinator::from_config(config)?);
    tracing::info!(
        "Coordinator fans out to {} index shards and {} document shards (top_k={}, timeout={}ms)",
        config.index_shards.len(),
        config.document_shards.len(),
        config.top_k,
        config.shard_timeout_ms
    );
    serve(config.frontend.addr, frontend_handlers::router(coordinator), "Frontend").await?;
    Ok(())
}

/// Runs the frontend and every shard of `config` in this process.
///
/// All partitions are loaded before any listener starts, so a bad file aborts startup
/// instead of leaving a half-started cluster. Returns when the first role stops.
pub async fn run_all(config: ClusterConfig) -> Result<()> {
    let index_services = (0..config.index_shards.len())
        .map(|shard| index_service(&config, shard))
        .collect::<Result<Vec<_>>>()?;
    let document_services = (0..config.document_shards.len())
        .map(|shard| document_service(&config, shard))
        .collect::<Result<Vec<_>>>()?;
    let coordinator = Arc::new(QueryCoordinator::from_config(&config)?);

    let mut roles = JoinSet::new();
    for (shard, service) in document_services.into_iter().enumerate() {
        let addr = config.document_shards[shard].addr;
        roles.spawn(async move {
            serve(addr, doc_handlers::router(service), &format!("Document shard {}", shard)).await
        });
    }
    for (shard, service) in index_services.into_iter().enumerate() {
        let addr = config.index_shards[shard].addr;
        roles.spawn(async move {
            serve(addr, index_handlers::router(service), &format!("Index shard {}", shard)).await
        });
    }
    let frontend_addr = config.frontend.addr;
    roles.spawn(async move {
        serve(frontend_addr, frontend_handlers::router(coordinator), "Frontend").await
    });

    match roles.join_next().await {
        Some(outcome) => {
            outcome.context("role task panicked")?.context("role stopped")?;
            Ok(())
        }
        None => Ok(()),
    }
}
