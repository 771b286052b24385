//! Axum application wiring.
//!
//! - `services.rs`: store wiring and the operations the handlers call
//! - `routes/`: HTTP handlers (one file per resource)
//! - `dto.rs`: response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router.
///
/// Order and tag routes are mounted under `api_prefix` (`""` mounts them at
/// the root, otherwise the order list answers at both `<prefix>` and
/// `<prefix>/`); `/health` always stays at the root.
pub fn build_app(services: AppServices, api_prefix: &str) -> Router {
    let api = if api_prefix.is_empty() {
        routes::router()
    } else {
        Router::new()
            .nest(api_prefix, routes::router())
            .route(&format!("{api_prefix}/"), routes::order_collection())
    };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(Arc::new(services))),
        )
}
