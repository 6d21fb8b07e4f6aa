//! Services of the request-logging pipeline.

pub mod config_service;
pub mod entry_builder;
pub mod filter_policy;
pub mod request_logger;
pub mod settings_resolver;

pub use config_service::ConfigService;
pub use entry_builder::EntryBuilder;
pub use filter_policy::FilterPolicy;
pub use request_logger::SeqRequestLogger;
pub use settings_resolver::SettingsResolver;
