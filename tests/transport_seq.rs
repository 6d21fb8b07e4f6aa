mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use seq_request_logs::domain::entities::{LogEntry, SeqUrl};
use seq_request_logs::infrastructure::transport::{DeliveryError, LogTransport, SeqTransport};
use seq_request_logs::routes::app_router;
use seq_request_logs::SeqRequestLogsFeature;

fn transport_for(seq: &common::RecordingSeq, api_key: Option<&str>) -> SeqTransport {
    let url = SeqUrl::parse(&seq.url()).unwrap();
    SeqTransport::new(&url, api_key, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_send_posts_envelope_with_api_key() {
    let seq = common::RecordingSeq::start().await;
    let transport = transport_for(&seq, Some("key-123"));

    let mut entry = LogEntry::new();
    entry.get_or_add("HttpMethod", "GET");
    transport.send(&entry).await.unwrap();

    let requests = seq.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].api_key.as_deref(), Some("key-123"));
    assert_eq!(requests[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        requests[0].body,
        json!({
            "events": [{
                "Level": "Debug",
                "Properties": { "HttpMethod": "GET" },
                "MessageTemplate": "SeqRequestLogs request"
            }]
        })
    );
}

#[tokio::test]
async fn test_send_without_api_key_omits_header() {
    let seq = common::RecordingSeq::start().await;
    let transport = transport_for(&seq, None);

    transport.send(&LogEntry::new()).await.unwrap();

    let requests = seq.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].api_key.is_none());
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let seq = common::RecordingSeq::start_with_status(StatusCode::UNAUTHORIZED).await;
    let transport = transport_for(&seq, Some("wrong"));

    let result = transport.send(&LogEntry::new()).await;

    assert!(matches!(result, Err(DeliveryError::Status { status: 401 })));
}

#[tokio::test]
async fn test_end_to_end_request_reaches_seq() {
    let seq = common::RecordingSeq::start().await;
    let logger = SeqRequestLogsFeature::new(seq.url())
        .api_key("e2e-key")
        .build()
        .unwrap();
    let app = app_router(Arc::new(logger));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let response = reqwest::get(format!("http://{addr}/hello/world")).await.unwrap();
    assert!(response.status().is_success());

    let requests = seq.wait_for(1).await;
    let event = &requests[0].body["events"][0];
    assert_eq!(requests[0].api_key.as_deref(), Some("e2e-key"));
    assert_eq!(event["Level"], "Debug");
    assert_eq!(event["Properties"]["HttpMethod"], "GET");
    assert_eq!(event["Properties"]["PathInfo"], "/hello/world");
    assert_eq!(event["Properties"]["IpAddress"], "127.0.0.1");
    assert_eq!(
        event["Properties"]["AbsoluteUri"],
        format!("http://{addr}/hello/world")
    );
    assert!(event["Timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_delivery_failure_does_not_affect_response() {
    let seq = common::RecordingSeq::start_with_status(StatusCode::INTERNAL_SERVER_ERROR).await;
    let logger = SeqRequestLogsFeature::new(seq.url()).build().unwrap();
    let server = axum_test::TestServer::new(app_router(Arc::new(logger))).unwrap();

    let response = server.get("/hello/world").await;

    response.assert_status_ok();
    seq.wait_for(1).await;
}
