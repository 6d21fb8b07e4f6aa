//! Core domain entities of the request-logging pipeline.
//!
//! # Entity Types
//!
//! - [`LogEntry`] - A structured event shipped to Seq
//! - [`RequestContext`] / [`RequestDto`] - What the host knows about the request
//! - [`ResponseOutcome`] - How the request ended
//! - [`FeatureConfig`] - Snapshot of the feature toggles and lists
//!
//! Entities are plain data structures; the policy and builder logic lives in
//! [`crate::application::services`].

pub mod feature_config;
pub mod log_entry;
pub mod request;
pub mod response;

pub use feature_config::{FeatureConfig, FeatureToggles, FeatureTogglesPatch, SeqUrl};
pub use log_entry::{Level, LogEntry};
pub use request::{
    CallerRoles, RequestContext, RequestDto, RequestDtoType, RequestItems, SessionInfo,
};
pub use response::{ErrorDetails, ErrorResponse, ExceptionInfo, ResponseOutcome};
