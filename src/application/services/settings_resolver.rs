//! Typed access to the feature settings.

use std::sync::Arc;

use crate::domain::entities::{FeatureConfig, SeqUrl};
use crate::domain::settings::{SettingsStore, keys, parse_bool};
use crate::error::AppError;

/// Reads and writes feature settings through a [`SettingsStore`].
///
/// Booleans fall back to their default when missing or unparsable. Only the
/// Seq URL is validated; every other value is passed through as-is.
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
}

impl SettingsResolver {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// The configured Seq URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the URL is missing or invalid.
    pub fn seq_url(&self) -> Result<SeqUrl, AppError> {
        SeqUrl::parse_required(self.raw_seq_url().as_deref())
    }

    /// The stored Seq URL, unvalidated.
    pub fn raw_seq_url(&self) -> Option<String> {
        self.store.get_string(keys::SEQ_URL)
    }

    /// Validates `value` and stores it as the Seq URL.
    ///
    /// Nothing is written when validation fails.
    pub fn set_seq_url(&self, value: &str) -> Result<SeqUrl, AppError> {
        let url = SeqUrl::parse(value)?;
        self.store.set_string(keys::SEQ_URL, &url.to_string());
        Ok(url)
    }

    pub fn api_key(&self) -> Option<String> {
        self.store.get_string(keys::API_KEY)
    }

    pub fn set_api_key(&self, value: &str) {
        self.store.set_string(keys::API_KEY, value);
    }

    pub fn enabled(&self) -> bool {
        self.bool_or(keys::ENABLED, true)
    }

    pub fn error_tracking(&self) -> bool {
        self.bool_or(keys::ERROR_TRACKING, true)
    }

    pub fn request_body_tracking(&self) -> bool {
        self.bool_or(keys::REQUEST_BODY_TRACKING, false)
    }

    pub fn session_tracking(&self) -> bool {
        self.bool_or(keys::SESSION_TRACKING, false)
    }

    pub fn response_tracking(&self) -> bool {
        self.bool_or(keys::RESPONSE_TRACKING, false)
    }

    pub fn set_bool(&self, key: &str, value: bool) {
        self.store.set_string(key, if value { "true" } else { "false" });
    }

    /// Comma-separated roles, trimmed, blanks and duplicates dropped.
    pub fn required_roles(&self) -> Vec<String> {
        let mut roles: Vec<String> = Vec::new();
        let Some(raw) = self.store.get_string(keys::REQUIRED_ROLES) else {
            return roles;
        };

        for role in raw.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            if !roles.iter().any(|r| r == role) {
                roles.push(role.to_string());
            }
        }
        roles
    }

    pub fn set_required_roles(&self, roles: &[String]) {
        self.store.set_string(keys::REQUIRED_ROLES, &roles.join(","));
    }

    /// Builds a full [`FeatureConfig`] snapshot from the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the Seq URL is missing or invalid.
    pub fn feature_config(&self) -> Result<FeatureConfig, AppError> {
        let mut config = FeatureConfig::new(self.seq_url()?);
        config.enabled = self.enabled();
        config.enable_error_tracking = self.error_tracking();
        config.enable_request_body_tracking = self.request_body_tracking();
        config.enable_session_tracking = self.session_tracking();
        config.enable_response_tracking = self.response_tracking();
        config.api_key = self.api_key();
        for role in self.required_roles() {
            config.add_required_role(role);
        }
        Ok(config)
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.store
            .get_string(key)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }
}
