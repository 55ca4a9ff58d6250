use crate::handlers;
use crate::state::DohState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// `/dns-query` (RFC 8484 GET and POST) and `/health`. Other methods on
/// `/dns-query` get 405 with an `Allow` header.
pub fn create_doh_routes(state: DohState) -> Router {
    Router::new()
        .route(
            "/dns-query",
            get(handlers::dns_query_get).post(handlers::dns_query_post),
        )
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
