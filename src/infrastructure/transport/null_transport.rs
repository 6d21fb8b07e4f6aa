//! No-op transport for disabled delivery.

use super::service::{DeliveryResult, LogTransport};
use crate::domain::entities::LogEntry;
use async_trait::async_trait;
use tracing::debug;

/// A transport that drops every entry.
///
/// # Use Cases
///
/// - Development environments without a Seq server
/// - Tests that exercise the pipeline without network access
pub struct NullTransport;

impl NullTransport {
    /// Creates a new NullTransport instance.
    pub fn new() -> Self {
        debug!("Using NullTransport (delivery disabled)");
        Self
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogTransport for NullTransport {
    async fn send(&self, _entry: &LogEntry) -> DeliveryResult<()> {
        Ok(())
    }

    fn target(&self) -> String {
        "null".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_transport_accepts_everything() {
        let transport = NullTransport::new();
        assert!(transport.send(&LogEntry::new()).await.is_ok());
        assert_eq!(transport.target(), "null");
    }
}
