#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use seq_request_logs::application::services::SeqRequestLogger;
use seq_request_logs::domain::entities::LogEntry;
use seq_request_logs::infrastructure::transport::{DeliveryResult, LogTransport};
use seq_request_logs::SeqRequestLogsFeature;

/// Forwards every entry to a channel instead of the network.
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<LogEntry>,
}

#[async_trait]
impl LogTransport for ChannelTransport {
    async fn send(&self, entry: &LogEntry) -> DeliveryResult<()> {
        let _ = self.tx.send(entry.clone());
        Ok(())
    }

    fn target(&self) -> String {
        "channel".to_string()
    }
}

pub fn channel_transport() -> (Arc<ChannelTransport>, mpsc::UnboundedReceiver<LogEntry>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelTransport { tx }), rx)
}

/// A feature builder pointed at a dummy Seq URL that delivers into a channel.
pub fn feature_with_channel() -> (SeqRequestLogsFeature, mpsc::UnboundedReceiver<LogEntry>) {
    let (transport, rx) = channel_transport();
    let feature = SeqRequestLogsFeature::new("http://seq.test:5341").transport(transport);
    (feature, rx)
}

pub fn logger_with_channel() -> (Arc<SeqRequestLogger>, mpsc::UnboundedReceiver<LogEntry>) {
    let (feature, rx) = feature_with_channel();
    (Arc::new(feature.build().unwrap()), rx)
}

/// Waits for the next delivered entry.
pub async fn next_entry(rx: &mut mpsc::UnboundedReceiver<LogEntry>) -> LogEntry {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a log entry")
        .expect("transport channel closed")
}

/// Asserts that nothing is delivered within a short window.
pub async fn assert_no_entry(rx: &mut mpsc::UnboundedReceiver<LogEntry>) {
    let result = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(result.is_err(), "unexpected log entry: {:?}", result);
}

/// One request received by [`RecordingSeq`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct RecordingState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
}

/// A local HTTP server standing in for Seq's raw ingestion endpoint.
pub struct RecordingSeq {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingSeq {
    pub async fn start() -> Self {
        Self::start_with_status(StatusCode::CREATED).await
    }

    pub async fn start_with_status(status: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = RecordingState {
            requests: Arc::clone(&requests),
            status,
        };

        let app = Router::new()
            .route("/api/events/raw", post(record))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Polls until at least `count` requests arrived.
    pub async fn wait_for(&self, count: usize) -> Vec<RecordedRequest> {
        for _ in 0..100 {
            let requests = self.requests();
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Seq received {} requests, expected {}", self.requests().len(), count);
    }
}

async fn record(
    State(state): State<RecordingState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        api_key: header("x-seq-apikey"),
        content_type: header("content-type"),
        body,
    });

    state.status
}
