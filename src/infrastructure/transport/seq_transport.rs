//! Seq raw-events transport over HTTP.

use super::service::{DeliveryError, DeliveryResult, LogTransport};
use crate::domain::entities::{LogEntry, SeqUrl};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Header carrying the Seq API key.
pub const API_KEY_HEADER: &str = "X-Seq-ApiKey";

/// Default timeout for a single POST to Seq.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Body of a raw ingestion request: `{"events": [entry]}`.
#[derive(Debug, Serialize)]
pub struct SeqEnvelope<'a> {
    pub events: &'a [LogEntry],
}

impl<'a> SeqEnvelope<'a> {
    pub fn single(entry: &'a LogEntry) -> Self {
        Self {
            events: std::slice::from_ref(entry),
        }
    }
}

/// Posts each entry to `{seq_url}/api/events/raw`.
///
/// Uses one pooled `reqwest::Client` for all deliveries. The API key header is
/// only attached when the key is non-blank.
pub struct SeqTransport {
    client: reqwest::Client,
    events_uri: String,
    api_key: Option<String>,
}

impl SeqTransport {
    /// Builds a transport with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Http`] if the HTTP client cannot be constructed
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(seq_url: &SeqUrl, api_key: Option<&str>, timeout: Duration) -> DeliveryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, seq_url, api_key))
    }

    /// Builds a transport around an existing client.
    pub fn with_client(client: reqwest::Client, seq_url: &SeqUrl, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        Self {
            client,
            events_uri: seq_url.events_uri(),
            api_key,
        }
    }

    pub fn events_uri(&self) -> &str {
        &self.events_uri
    }
}

#[async_trait]
impl LogTransport for SeqTransport {
    async fn send(&self, entry: &LogEntry) -> DeliveryResult<()> {
        let body = serde_json::to_vec(&SeqEnvelope::single(entry))?;

        let mut request = self
            .client
            .post(&self.events_uri)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }

        debug!(uri = %self.events_uri, "Delivered request log to Seq");
        Ok(())
    }

    fn target(&self) -> String {
        self.events_uri.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq_url() -> SeqUrl {
        SeqUrl::parse("http://localhost:5341").unwrap()
    }

    #[test]
    fn test_envelope_wraps_single_entry() {
        let entry = LogEntry::new();
        let json = serde_json::to_string(&SeqEnvelope::single(&entry)).unwrap();

        assert_eq!(
            json,
            r#"{"events":[{"Level":"Debug","Properties":{},"MessageTemplate":"SeqRequestLogs request"}]}"#
        );
    }

    #[test]
    fn test_events_uri() {
        let transport = SeqTransport::with_client(reqwest::Client::new(), &seq_url(), None);
        assert_eq!(transport.events_uri(), "http://localhost:5341/api/events/raw");
        assert_eq!(transport.target(), "http://localhost:5341/api/events/raw");
    }

    #[test]
    fn test_blank_api_key_is_dropped() {
        let transport =
            SeqTransport::with_client(reqwest::Client::new(), &seq_url(), Some("   "));
        assert!(transport.api_key.is_none());

        let transport =
            SeqTransport::with_client(reqwest::Client::new(), &seq_url(), Some("key-1"));
        assert_eq!(transport.api_key.as_deref(), Some("key-1"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        // port 9 (discard) on localhost is not expected to accept HTTP
        let url = SeqUrl::parse("http://127.0.0.1:9").unwrap();
        let transport = SeqTransport::new(&url, None, Duration::from_secs(2)).unwrap();

        let result = transport.send(&LogEntry::new()).await;
        assert!(matches!(result, Err(DeliveryError::Http(_))));
    }
}
