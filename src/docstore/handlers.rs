use super::protocol::{DocQueryParams, DocResponse, ENDPOINT_DOC, ErrorResponse};
use super::service::DocumentShardService;
use crate::error::SearchError;
use crate::server::health_router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;

pub async fn handle_resolve(
    Extension(service): Extension<Arc<DocumentShardService>>,
    Query(params): Query<DocQueryParams>,
) -> Response {
    match service.resolve(params.id, &params.q) {
        Ok(result) => (
            StatusCode::OK,
            Json(DocResponse {
                results: vec![result],
            }),
        )
            .into_response(),
        Err(e @ SearchError::ShardDataInconsistency { .. }) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to resolve doc {}: {}", params.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub fn router(service: Arc<DocumentShardService>) -> Router {
    let shard_id = service.shard_id();
    Router::new()
        .route(ENDPOINT_DOC, get(handle_resolve))
        .layer(Extension(service))
        .merge(health_router("document", Some(shard_id)))
}
