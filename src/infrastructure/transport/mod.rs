//! Delivery of log entries to Seq.
//!
//! Provides a [`LogTransport`] trait with two implementations:
//! - [`SeqTransport`] - HTTP POST to the Seq raw ingestion endpoint
//! - [`NullTransport`] - No-op implementation for disabled delivery

mod null_transport;
mod seq_transport;
mod service;

pub use null_transport::NullTransport;
pub use seq_transport::{API_KEY_HEADER, DEFAULT_TIMEOUT_SECS, SeqEnvelope, SeqTransport};
pub use service::{DeliveryError, DeliveryResult, LogTransport};

#[cfg(test)]
pub use service::MockLogTransport;
