//! Application layer services implementing the logging pipeline.
//!
//! This layer orchestrates the domain model: it decides whether a request is
//! logged, builds the entry, hands it to a transport and applies runtime
//! configuration changes. HTTP handlers and middleware call into it.
//!
//! # Available Services
//!
//! - [`services::settings_resolver::SettingsResolver`] - Typed access to the settings store
//! - [`services::filter_policy::FilterPolicy`] - Skip / exclusion decisions
//! - [`services::entry_builder::EntryBuilder`] - Log entry construction
//! - [`services::request_logger::SeqRequestLogger`] - The per-request entry point
//! - [`services::config_service::ConfigService`] - Runtime toggle updates

pub mod hooks;
pub mod services;
