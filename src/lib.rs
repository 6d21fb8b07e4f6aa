//! # Seq Request Logs
//!
//! Request logging for axum services that ships one structured event per
//! HTTP request to a [Seq](https://datalust.co/seq) server.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Log entries, request/response snapshots, feature config
//! - **Application Layer** ([`application`]) - Filter policy, entry builder, request logger
//! - **Infrastructure Layer** ([`infrastructure`]) - Settings stores and the Seq transport
//! - **API Layer** ([`api`]) - Middleware, admin and demo handlers
//!
//! ## Pipeline
//!
//! ```text
//! request ─► middleware ─► raw log hook ─► filter policy ─► entry builder ─► spawned POST
//!                                                                           {seq}/api/events/raw
//! ```
//!
//! Delivery is fire-and-forget: failures are written to the local `tracing`
//! log and never reach the request.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use seq_request_logs::prelude::*;
//!
//! let logger = SeqRequestLogsFeature::new("http://localhost:5341")
//!     .api_key("secret")
//!     .build()?;
//!
//! let app = register(router, Arc::new(logger));
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`];
//! feature settings via [`infrastructure::settings::EnvSettings`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod feature;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use feature::{SeqRequestLogsFeature, register};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::hooks::{
        PropertyAppender, RawLogEvent, SkipLogging, skip_paths_matching,
    };
    pub use crate::application::services::{SeqRequestLogger, SettingsResolver};
    pub use crate::domain::entities::{
        CallerRoles, ErrorDetails, ExceptionInfo, FeatureConfig, Level, LogEntry, RequestContext,
        RequestDto, RequestItems, ResponseOutcome, SessionInfo,
    };
    pub use crate::error::AppError;
    pub use crate::feature::{SeqRequestLogsFeature, register};
    pub use crate::infrastructure::transport::{LogTransport, SeqTransport};
    pub use crate::state::AppState;
}
