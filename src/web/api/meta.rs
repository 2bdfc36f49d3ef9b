//! API endpoints for health and discovery.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::{DiscoveryDocument, Dispatcher, HealthReport};

/// Liveness check.
pub async fn health() -> Json<HealthReport> {
    Json(HealthReport::healthy())
}

/// List the capabilities served here.
pub async fn discovery(State(dispatcher): State<Arc<Dispatcher>>) -> Json<DiscoveryDocument> {
    Json(dispatcher.discovery())
}
