//! Demo endpoints exercising the request logger.

use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::dto::demo::{HelloRequest, HelloResponse};
use crate::domain::entities::{ErrorDetails, RequestDto};

/// `GET|POST /hello/{name}`
pub async fn hello_handler(Path(name): Path<String>) -> impl IntoResponse {
    let req = HelloRequest { name };
    let dto = RequestDto::of("Hello", &req);

    (
        Extension(dto),
        Json(HelloResponse {
            result: format!("Hello, {}!", req.name),
        }),
    )
}

/// `GET /fail` - answers with a client error carrying error details.
pub async fn fail_handler() -> impl IntoResponse {
    let details = ErrorDetails {
        error_code: "DemoFailure".to_string(),
        message: "This endpoint always fails".to_string(),
        stack_trace: None,
    };

    (
        StatusCode::BAD_REQUEST,
        Extension(details),
        Json(json!({
            "error": {
                "code": "DemoFailure",
                "message": "This endpoint always fails",
                "details": {}
            }
        })),
    )
}

/// `GET /panic` - panics inside the handler.
pub async fn panic_handler() -> &'static str {
    panic!("demo handler panicked")
}
