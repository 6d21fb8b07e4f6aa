//! Domain layer containing the request-log model.
//!
//! # Architecture
//!
//! - [`entities`] - Log entry, request/response snapshots, feature configuration
//! - [`settings`] - Settings store contract and key names
//! - [`request_counter`] - Correlation counter shared by all requests
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - The settings store trait defines a contract implemented by the infrastructure layer
//! - Policy and entry construction live in services (see [`crate::application::services`])

pub mod entities;
pub mod request_counter;
pub mod settings;
