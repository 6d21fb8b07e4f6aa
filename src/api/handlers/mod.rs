//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod config;
pub mod demo;
pub mod health;

pub use config::{config_handler, config_query_handler};
pub use demo::{fail_handler, hello_handler, panic_handler};
pub use health::health_handler;
