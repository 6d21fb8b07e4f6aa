//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for settings storage and log delivery.
//!
//! # Modules
//!
//! - [`settings`] - Settings stores (environment and in-memory)
//! - [`transport`] - Delivery to Seq (HTTP and no-op implementations)

pub mod settings;
pub mod transport;
