mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use seq_request_logs::AppState;
use seq_request_logs::api::handlers::health_handler;
use seq_request_logs::routes::app_router;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (logger, _rx) = common::logger_with_channel();
    let server = TestServer::new(app_router(logger)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["request_logger"]["status"], "ok");
    assert_eq!(json["checks"]["seq"]["status"], "ok");
    assert_eq!(json["checks"]["seq"]["message"], "channel");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let (logger, _rx) = common::logger_with_channel();
    let server = TestServer::new(app_router(logger)).unwrap();

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("checks").is_some());
    assert!(json["checks"].get("request_logger").is_some());
    assert!(json["checks"].get("seq").is_some());
}

#[tokio::test]
async fn test_health_without_logger_is_degraded() {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(AppState::default());

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["request_logger"]["status"], "error");
}
