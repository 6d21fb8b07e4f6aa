//! HTTP middleware for request processing.
//!
//! Provides request logging, panic capture, and observability middleware.

pub mod catch_panic;
pub mod request_log;
pub mod tracing;
