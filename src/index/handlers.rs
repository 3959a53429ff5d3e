use super::protocol::{ENDPOINT_INDEX, IndexQueryParams, IndexResponse};
use super::service::IndexShardService;
use crate::server::health_router;
use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;

pub async fn handle_index_query(
    Extension(service): Extension<Arc<IndexShardService>>,
    Query(params): Query<IndexQueryParams>,
) -> Json<IndexResponse> {
    let scored = service.score_query(&params.q);
    tracing::debug!(
        "Index shard {} answered {:?} with {} postings",
        service.shard_id(),
        params.q,
        scored.len()
    );
    Json(IndexResponse::from_scored(scored))
}

pub fn router(service: Arc<IndexShardService>) -> Router {
    let shard_id = service.shard_id();
    Router::new()
        .route(ENDPOINT_INDEX, get(handle_index_query))
        .layer(Extension(service))
        .merge(health_router("index", Some(shard_id)))
}
