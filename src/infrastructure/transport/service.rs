//! Transport trait and delivery error types.

use async_trait::async_trait;

use crate::domain::entities::LogEntry;

/// Errors that can occur while delivering a log entry.
///
/// These never reach the request path: the logger catches them inside the
/// delivery task and writes them to the diagnostic log.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Seq request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Seq responded with status {status}")]
    Status { status: u16 },

    #[error("Failed to serialize log entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Ships a single log entry to the aggregation endpoint.
///
/// Implementations must be thread-safe. Callers run [`LogTransport::send`] on
/// a background task and only log its error; there is no retry.
///
/// # Implementations
///
/// - [`crate::infrastructure::transport::SeqTransport`] - Seq raw events over HTTP
/// - [`crate::infrastructure::transport::NullTransport`] - Drops every entry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogTransport: Send + Sync {
    /// Delivers one entry.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] on network failures, timeouts and non-2xx responses.
    async fn send(&self, entry: &LogEntry) -> DeliveryResult<()>;

    /// Human-readable target, used in diagnostics.
    fn target(&self) -> String;
}
