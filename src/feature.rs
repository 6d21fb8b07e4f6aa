//! Registration of the request-logging feature with an axum router.
//!
//! # Example
//!
//! ```rust,ignore
//! let logger = SeqRequestLogsFeature::new("http://localhost:5341")
//!     .api_key("secret")
//!     .enable_session_tracking(true)
//!     .skip_logging(skip_paths_matching("^/health$")?)
//!     .build()?;
//!
//! let app = register(Router::new().route("/", get(index)), Arc::new(logger));
//! ```

use axum::{Router, middleware};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::api::middleware::{catch_panic, request_log};
use crate::api::routes::config_routes;
use crate::application::hooks::{PropertyAppender, RawLogEvent, SkipLogging};
use crate::application::services::entry_builder::DEFAULT_MAX_BODY_BYTES;
use crate::application::services::{SeqRequestLogger, SettingsResolver};
use crate::domain::entities::feature_config::{
    default_exclude_request_dto_types, default_hide_request_body_types,
};
use crate::domain::entities::{FeatureConfig, RequestDtoType, SeqUrl};
use crate::domain::request_counter::RequestCounter;
use crate::error::AppError;
use crate::infrastructure::transport::{DEFAULT_TIMEOUT_SECS, LogTransport, SeqTransport};
use crate::state::AppState;

/// Builder for a [`SeqRequestLogger`].
///
/// Defaults: enabled, error tracking on, body/session/response tracking off,
/// `RequestLogs` excluded, `Authenticate`/`Register` bodies hidden.
pub struct SeqRequestLogsFeature {
    seq_url: Option<String>,
    api_key: Option<String>,
    enabled: bool,
    enable_error_tracking: bool,
    enable_request_body_tracking: bool,
    enable_session_tracking: bool,
    enable_response_tracking: bool,
    exclude_request_dto_types: BTreeSet<RequestDtoType>,
    hide_request_body_for_request_dto_types: BTreeSet<RequestDtoType>,
    required_roles: Vec<String>,
    skip_logging: Option<SkipLogging>,
    append_properties: Option<PropertyAppender>,
    raw_log_event: Option<RawLogEvent>,
    transport: Option<Arc<dyn LogTransport>>,
    counter: Option<Arc<RequestCounter>>,
    timeout: Duration,
    max_body_bytes: usize,
}

impl SeqRequestLogsFeature {
    pub fn new(seq_url: impl Into<String>) -> Self {
        Self {
            seq_url: Some(seq_url.into()),
            api_key: None,
            enabled: true,
            enable_error_tracking: true,
            enable_request_body_tracking: false,
            enable_session_tracking: false,
            enable_response_tracking: false,
            exclude_request_dto_types: default_exclude_request_dto_types(),
            hide_request_body_for_request_dto_types: default_hide_request_body_types(),
            required_roles: Vec::new(),
            skip_logging: None,
            append_properties: None,
            raw_log_event: None,
            transport: None,
            counter: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Starts from the values in a settings store.
    ///
    /// A missing or invalid Seq URL is reported by [`SeqRequestLogsFeature::build`].
    pub fn from_settings(settings: &SettingsResolver) -> Self {
        let mut feature = Self::new(String::new());
        feature.seq_url = settings.raw_seq_url();
        feature.api_key = settings.api_key();
        feature.enabled = settings.enabled();
        feature.enable_error_tracking = settings.error_tracking();
        feature.enable_request_body_tracking = settings.request_body_tracking();
        feature.enable_session_tracking = settings.session_tracking();
        feature.enable_response_tracking = settings.response_tracking();
        feature.required_roles = settings.required_roles();
        feature
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn enabled(mut self, value: bool) -> Self {
        self.enabled = value;
        self
    }

    pub fn enable_error_tracking(mut self, value: bool) -> Self {
        self.enable_error_tracking = value;
        self
    }

    pub fn enable_request_body_tracking(mut self, value: bool) -> Self {
        self.enable_request_body_tracking = value;
        self
    }

    pub fn enable_session_tracking(mut self, value: bool) -> Self {
        self.enable_session_tracking = value;
        self
    }

    pub fn enable_response_tracking(mut self, value: bool) -> Self {
        self.enable_response_tracking = value;
        self
    }

    /// Replaces the excluded DTO types.
    pub fn exclude_request_dto_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RequestDtoType>,
    {
        self.exclude_request_dto_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the DTO types whose payload is never logged.
    pub fn hide_request_body_for_request_dto_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RequestDtoType>,
    {
        self.hide_request_body_for_request_dto_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn required_roles<I, T>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for role in roles {
            let role = role.into();
            if !self.required_roles.contains(&role) {
                self.required_roles.push(role);
            }
        }
        self
    }

    pub fn skip_logging(mut self, predicate: SkipLogging) -> Self {
        self.skip_logging = Some(predicate);
        self
    }

    pub fn append_properties(mut self, appender: PropertyAppender) -> Self {
        self.append_properties = Some(appender);
        self
    }

    pub fn raw_log_event(mut self, hook: RawLogEvent) -> Self {
        self.raw_log_event = Some(hook);
        self
    }

    /// Delivers entries through `transport` instead of the Seq HTTP client.
    pub fn transport(mut self, transport: Arc<dyn LogTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn request_counter(mut self, counter: Arc<RequestCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Validates the settings and builds the logger.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the Seq URL is missing or
    /// invalid, or the HTTP client cannot be created.
    pub fn build(self) -> Result<SeqRequestLogger, AppError> {
        let seq_url = SeqUrl::parse_required(self.seq_url.as_deref())?;

        let mut config = FeatureConfig::new(seq_url);
        config.enabled = self.enabled;
        config.enable_error_tracking = self.enable_error_tracking;
        config.enable_request_body_tracking = self.enable_request_body_tracking;
        config.enable_session_tracking = self.enable_session_tracking;
        config.enable_response_tracking = self.enable_response_tracking;
        config.exclude_request_dto_types = self.exclude_request_dto_types;
        config.hide_request_body_for_request_dto_types = self.hide_request_body_for_request_dto_types;
        config.required_roles = self.required_roles;
        config.api_key = self.api_key;

        let transport: Arc<dyn LogTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let transport =
                    SeqTransport::new(&config.seq_url, config.effective_api_key(), self.timeout)
                        .map_err(|e| {
                            AppError::configuration(
                                "Failed to create the Seq HTTP client",
                                json!({ "reason": e.to_string() }),
                            )
                        })?;
                Arc::new(transport)
            }
        };

        info!(
            seq = %transport.target(),
            enabled = config.enabled,
            body_tracking = config.enable_request_body_tracking,
            response_tracking = config.enable_response_tracking,
            "Seq request logging configured"
        );

        let counter = self
            .counter
            .unwrap_or_else(|| Arc::new(RequestCounter::new()));

        Ok(SeqRequestLogger::new(config, transport, counter)
            .with_skip_logging(self.skip_logging)
            .with_append_properties(self.append_properties)
            .with_raw_log_event(self.raw_log_event)
            .with_max_body_bytes(self.max_body_bytes))
    }
}

/// Mounts the configuration route and wraps every route of `router` with
/// request logging.
///
/// Call after all routes are added; routes merged later are not logged.
pub fn register<S>(router: Router<S>, logger: Arc<SeqRequestLogger>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let admin = config_routes().with_state(AppState::new(Arc::clone(&logger)));

    router
        .merge(admin)
        .layer(catch_panic::layer())
        .layer(middleware::from_fn_with_state(logger, request_log::layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::keys;
    use crate::infrastructure::settings::MemorySettings;
    use crate::infrastructure::transport::NullTransport;

    #[test]
    fn test_build_requires_valid_seq_url() {
        for bad in ["", "  ", "notaurl"] {
            let result = SeqRequestLogsFeature::new(bad).build();
            assert!(matches!(result, Err(AppError::Configuration { .. })), "{bad:?}");
        }

        assert!(SeqRequestLogsFeature::new("http://localhost:5341").build().is_ok());
    }

    #[test]
    fn test_build_applies_builder_values() {
        let logger = SeqRequestLogsFeature::new("http://localhost:5341")
            .api_key("secret")
            .enable_session_tracking(true)
            .enable_request_body_tracking(true)
            .exclude_request_dto_types(["Ping"])
            .required_roles(["admin", "ops", "admin"])
            .transport(Arc::new(NullTransport::new()))
            .build()
            .unwrap();

        let config = logger.config();
        assert!(config.enable_session_tracking);
        assert!(config.is_excluded(Some(&"Ping".into())));
        assert!(!config.is_excluded(Some(&"RequestLogs".into())));
        assert_eq!(config.required_roles, vec!["admin", "ops"]);
        assert_eq!(config.effective_api_key(), Some("secret"));
        assert!(logger.captures_request_bodies());
        assert_eq!(logger.transport_target(), "null");
    }

    #[test]
    fn test_from_settings() {
        let store = MemorySettings::new()
            .with(keys::SEQ_URL, "http://seq:5341")
            .with(keys::RESPONSE_TRACKING, "true")
            .with(keys::REQUIRED_ROLES, "admin");
        let resolver = SettingsResolver::new(Arc::new(store));

        let logger = SeqRequestLogsFeature::from_settings(&resolver)
            .transport(Arc::new(NullTransport::new()))
            .build()
            .unwrap();

        let config = logger.config();
        assert!(config.enable_response_tracking);
        assert_eq!(config.required_roles, vec!["admin"]);
        assert_eq!(config.seq_url.to_string(), "http://seq:5341");
    }

    #[test]
    fn test_from_settings_without_url_fails_on_build() {
        let resolver = SettingsResolver::new(Arc::new(MemorySettings::new()));
        let result = SeqRequestLogsFeature::from_settings(&resolver).build();

        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
