use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::connector::api::Container;

use super::handlers;

/// Build the HTTP API over a shared container.
///
/// An empty `cors_origins` list allows any origin.
pub fn build_router(container: Arc<Container>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/ingest", post(handlers::ingest))
        .route("/api/chat", post(handlers::chat))
        .route("/api/sources/{source}", delete(handlers::delete_source))
        .route("/api/stats", get(handlers::stats))
        .with_state(container)
        .layer(build_cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(cors_origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
