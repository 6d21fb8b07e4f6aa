mod common;

use axum::{Extension, Router};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;

use seq_request_logs::domain::entities::CallerRoles;
use seq_request_logs::register;

fn server_for(logger: Arc<seq_request_logs::application::services::SeqRequestLogger>) -> TestServer {
    TestServer::new(register(Router::new(), logger)).unwrap()
}

#[tokio::test]
async fn test_get_without_parameters_returns_current_toggles() {
    let (logger, _rx) = common::logger_with_channel();
    let server = server_for(logger);

    let response = server.get("/seq-request-log-config").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({
        "enabled": true,
        "enableSessionTracking": false,
        "enableRequestBodyTracking": false,
        "enableResponseTracking": false,
        "enableErrorTracking": true
    }));
}

#[tokio::test]
async fn test_get_with_query_updates_toggles() {
    let (logger, _rx) = common::logger_with_channel();
    let server = server_for(Arc::clone(&logger));

    let response = server
        .get("/seq-request-log-config")
        .add_query_param("enableSessionTracking", "true")
        .add_query_param("enableErrorTracking", "false")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["enableSessionTracking"], true);
    assert_eq!(json["enableErrorTracking"], false);

    let config = logger.config();
    assert!(config.enable_session_tracking);
    assert!(!config.enable_error_tracking);
}

#[tokio::test]
async fn test_post_partial_update_leaves_other_fields() {
    let (logger, _rx) = common::logger_with_channel();
    let server = server_for(Arc::clone(&logger));

    let response = server
        .post("/seq-request-log-config")
        .json(&json!({ "enabled": false }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["enabled"], false);
    assert_eq!(json["enableErrorTracking"], true);
    assert!(!logger.config().enabled);
}

#[tokio::test]
async fn test_response_tracking_rejected_while_body_tracking_on() {
    let (feature, _rx) = common::feature_with_channel();
    let logger = Arc::new(feature.enable_request_body_tracking(true).build().unwrap());
    let server = server_for(Arc::clone(&logger));

    let response = server
        .post("/seq-request-log-config")
        .json(&json!({ "enableResponseTracking": true }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "policy_rejection");
    assert!(!logger.config().enable_response_tracking);
}

#[tokio::test]
async fn test_response_tracking_allowed_when_body_tracking_turned_off_together() {
    let (feature, _rx) = common::feature_with_channel();
    let logger = Arc::new(feature.enable_request_body_tracking(true).build().unwrap());
    let server = server_for(Arc::clone(&logger));

    let response = server
        .post("/seq-request-log-config")
        .json(&json!({
            "enableRequestBodyTracking": false,
            "enableResponseTracking": true
        }))
        .await;

    response.assert_status_ok();
    let config = logger.config();
    assert!(config.enable_response_tracking);
    assert!(!config.enable_request_body_tracking);
}

#[tokio::test]
async fn test_required_roles_reject_caller_without_role() {
    let (feature, _rx) = common::feature_with_channel();
    let logger = Arc::new(feature.required_roles(["admin"]).build().unwrap());

    let app = register(Router::new(), Arc::clone(&logger))
        .layer(Extension(CallerRoles(vec!["viewer".to_string()])));
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/seq-request-log-config")
        .json(&json!({ "enabled": false }))
        .await;

    response.assert_status(axum::http::StatusCode::FORBIDDEN);
    assert!(logger.config().enabled);
}

#[tokio::test]
async fn test_required_roles_accept_caller_with_role() {
    let (feature, _rx) = common::feature_with_channel();
    let logger = Arc::new(feature.required_roles(["admin", "ops"]).build().unwrap());

    let app = register(Router::new(), Arc::clone(&logger))
        .layer(Extension(CallerRoles(vec!["ops".to_string()])));
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/seq-request-log-config")
        .json(&json!({ "enabled": false }))
        .await;

    response.assert_status_ok();
    assert!(!logger.config().enabled);
}

#[tokio::test]
async fn test_config_requests_are_logged_with_dto() {
    let (logger, mut rx) = common::logger_with_channel();
    let server = server_for(logger);

    server
        .post("/seq-request-log-config")
        .json(&json!({ "enableSessionTracking": true }))
        .await
        .assert_status_ok();

    let entry = common::next_entry(&mut rx).await;
    assert_eq!(entry.property("RequestDto"), Some(&json!({ "enableSessionTracking": true })));
    assert_eq!(entry.property("HttpMethod"), Some(&json!("POST")));
}
