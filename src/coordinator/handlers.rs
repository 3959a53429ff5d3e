use super::protocol::{ENDPOINT_SEARCH, SearchParams};
use super::service::QueryCoordinator;
use crate::server::{ErrorResponse, health_router};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;

pub async fn handle_search(
    Extension(coordinator): Extension<Arc<QueryCoordinator>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match coordinator.search(&params.q, params.k).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            tracing::error!("Search for {:?} failed: {}", params.q, e);
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

pub fn router(coordinator: Arc<QueryCoordinator>) -> Router {
    Router::new()
        .route(ENDPOINT_SEARCH, get(handle_search))
        .layer(Extension(coordinator))
        .merge(health_router("frontend", None))
}
