//! API route configuration.

use crate::api::handlers::{
    config_handler, config_query_handler, fail_handler, hello_handler, panic_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Path of the configuration endpoint.
pub const CONFIG_PATH: &str = "/seq-request-log-config";

/// Runtime configuration of the request logger.
///
/// # Endpoints
///
/// - `GET  /seq-request-log-config` - Read or update toggles via query string
/// - `POST /seq-request-log-config` - Read or update toggles via JSON body
pub fn config_routes() -> Router<AppState> {
    Router::new().route(CONFIG_PATH, get(config_query_handler).post(config_handler))
}

/// Demo endpoints.
///
/// # Endpoints
///
/// - `GET|POST /hello/{name}` - Greets `name`, publishes a `Hello` request DTO
/// - `GET /fail`              - Client error with error details
/// - `GET /panic`             - Handler panic
pub fn demo_routes() -> Router<AppState> {
    Router::new()
        .route("/hello/{name}", get(hello_handler).post(hello_handler))
        .route("/fail", get(fail_handler))
        .route("/panic", get(panic_handler))
}
