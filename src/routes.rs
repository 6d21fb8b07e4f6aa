//! Top-level router configuration for the demo host.
//!
//! # Route Structure
//!
//! - `GET  /health`                 - Health check with logger status
//! - `GET|POST /hello/{name}`       - Demo greeting
//! - `GET  /fail`, `GET /panic`     - Demo failures
//! - `GET|POST /seq-request-log-config` - Runtime toggles (mounted by the feature)
//!
//! # Middleware
//!
//! - **Request log** - Ships every request to Seq
//! - **Catch panic** - Turns handler panics into logged `500` responses
//! - **Tracing** - Local structured request/response logging

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::application::services::SeqRequestLogger;
use crate::feature;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

/// Constructs the application router with all routes and middleware.
pub fn app_router(logger: Arc<SeqRequestLogger>) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(api::routes::demo_routes())
        .with_state(AppState::new(Arc::clone(&logger)));

    feature::register(router, logger).layer(tracing::layer())
}
