//! Route definitions for the exchange server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::api;
use crate::core::Dispatcher;

pub const DISCOVERY_PATH: &str = "/a2a/discovery";
pub const HEALTH_PATH: &str = "/health";

/// Largest request body accepted, in bytes. Enforced when the exchange
/// handler buffers the body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the full app router. Each advertised capability gets its own
/// exchange endpoint.
pub fn create_app_router(dispatcher: Arc<Dispatcher>) -> Router {
    let mut router: Router<Arc<Dispatcher>> = Router::new()
        .route(HEALTH_PATH, get(api::health))
        .route(DISCOVERY_PATH, get(api::discovery));

    for capability in dispatcher.discovery().services {
        router = router.route(&capability.endpoint, post(api::exchange));
    }

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}
