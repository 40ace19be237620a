use crate::error::ApiError;
use crate::state::{NestedRouter, State};
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

pub mod post;


pub fn route() -> NestedRouter {
    axum::Router::new()
        .merge(post::route())
        .fallback(not_found)
}

/// The full application: routes, request logging and trailing-slash trimming.
pub fn app(state: Arc<State>) -> NormalizePath<axum::Router> {
    NormalizePathLayer::trim_trailing_slash().layer(
        route()
            .with_state(state)
            .layer(TraceLayer::new_for_http()),
    )
}

pub(crate) async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
