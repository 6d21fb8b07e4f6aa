//! Converts handler panics into `500` responses the request logger can see.

use axum::{
    Extension, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

use crate::domain::entities::ExceptionInfo;

/// Creates the panic-catching layer.
///
/// The `500` response carries an [`ExceptionInfo`] extension so the
/// request-log middleware records the panic as an exception.
///
/// Must sit inside the request-log layer:
///
/// ```rust,ignore
/// router
///     .layer(catch_panic::layer())
///     .layer(middleware::from_fn_with_state(logger, request_log::layer))
/// ```
pub fn layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Box<dyn Any + Send + 'static>) -> Response)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());
    tracing::error!(panic = %message, "Handler panicked");

    let exception = ExceptionInfo::new("panic", message.clone()).with_source("handler");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Extension(exception),
        Json(json!({
            "error": {
                "code": "internal_error",
                "message": "Internal server error",
                "details": {}
            }
        })),
    )
        .into_response()
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    }
}
