//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization.

pub mod config;
pub mod demo;
pub mod health;
