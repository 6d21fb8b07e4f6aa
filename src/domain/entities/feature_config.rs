//! Feature configuration snapshot consulted per request.

use serde_json::json;
use std::collections::BTreeSet;
use std::fmt;
use url::Url;

use super::request::RequestDtoType;
use crate::error::AppError;

/// Path appended to the Seq base URL for raw event ingestion.
pub const RAW_EVENTS_PATH: &str = "/api/events/raw";

/// A validated absolute Seq server URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqUrl(Url);

impl SeqUrl {
    /// Parses and validates a Seq server URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the value is blank, relative,
    /// has no host, or uses a scheme other than `http`/`https`.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::configuration(
                "Seq Url is not a valid url",
                json!({ "reason": "empty" }),
            ));
        }

        let url = Url::parse(trimmed).map_err(|e| {
            AppError::configuration(
                "Seq Url is not a valid url",
                json!({ "value": trimmed, "reason": e.to_string() }),
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(AppError::configuration(
                "Seq Url is not a valid url",
                json!({ "value": trimmed, "reason": "expected an absolute http(s) url" }),
            ));
        }

        Ok(Self(url))
    }

    /// Parses an optional value; a missing URL is a configuration error.
    pub fn parse_required(input: Option<&str>) -> Result<Self, AppError> {
        match input {
            Some(value) => Self::parse(value),
            None => Err(AppError::configuration(
                "Seq Url is required",
                json!({ "reason": "missing" }),
            )),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Full URI of the raw events endpoint.
    pub fn events_uri(&self) -> String {
        format!("{}{}", self.0.as_str().trim_end_matches('/'), RAW_EVENTS_PATH)
    }
}

impl fmt::Display for SeqUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str().trim_end_matches('/'))
    }
}

/// Immutable snapshot of the request-logging feature flags.
///
/// A new snapshot is published as a whole whenever the admin endpoint
/// changes a toggle; requests in flight keep the snapshot they started with.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub enabled: bool,
    pub enable_error_tracking: bool,
    pub enable_request_body_tracking: bool,
    pub enable_session_tracking: bool,
    pub enable_response_tracking: bool,
    pub exclude_request_dto_types: BTreeSet<RequestDtoType>,
    pub hide_request_body_for_request_dto_types: BTreeSet<RequestDtoType>,
    /// Roles allowed to change the configuration at runtime, in insertion order.
    pub required_roles: Vec<String>,
    pub seq_url: SeqUrl,
    pub api_key: Option<String>,
}

impl FeatureConfig {
    /// Creates a snapshot with the documented defaults.
    pub fn new(seq_url: SeqUrl) -> Self {
        Self {
            enabled: true,
            enable_error_tracking: true,
            enable_request_body_tracking: false,
            enable_session_tracking: false,
            enable_response_tracking: false,
            exclude_request_dto_types: default_exclude_request_dto_types(),
            hide_request_body_for_request_dto_types: default_hide_request_body_types(),
            required_roles: Vec::new(),
            seq_url,
            api_key: None,
        }
    }

    /// The API key, if it contains anything but whitespace.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn is_excluded(&self, dto_type: Option<&RequestDtoType>) -> bool {
        dto_type.is_some_and(|t| self.exclude_request_dto_types.contains(t))
    }

    pub fn is_body_hidden(&self, dto_type: Option<&RequestDtoType>) -> bool {
        dto_type.is_some_and(|t| self.hide_request_body_for_request_dto_types.contains(t))
    }

    /// Adds a role unless it is already present.
    pub fn add_required_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        if !self.required_roles.contains(&role) {
            self.required_roles.push(role);
        }
    }
}

/// The five runtime-switchable toggles of a [`FeatureConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureToggles {
    pub enabled: bool,
    pub enable_error_tracking: bool,
    pub enable_request_body_tracking: bool,
    pub enable_session_tracking: bool,
    pub enable_response_tracking: bool,
}

impl From<&FeatureConfig> for FeatureToggles {
    fn from(config: &FeatureConfig) -> Self {
        Self {
            enabled: config.enabled,
            enable_error_tracking: config.enable_error_tracking,
            enable_request_body_tracking: config.enable_request_body_tracking,
            enable_session_tracking: config.enable_session_tracking,
            enable_response_tracking: config.enable_response_tracking,
        }
    }
}

/// A partial toggle update; `None` leaves the current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureTogglesPatch {
    pub enabled: Option<bool>,
    pub enable_error_tracking: Option<bool>,
    pub enable_request_body_tracking: Option<bool>,
    pub enable_session_tracking: Option<bool>,
    pub enable_response_tracking: Option<bool>,
}

impl FeatureTogglesPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, config: &mut FeatureConfig) {
        if let Some(v) = self.enabled {
            config.enabled = v;
        }
        if let Some(v) = self.enable_error_tracking {
            config.enable_error_tracking = v;
        }
        if let Some(v) = self.enable_request_body_tracking {
            config.enable_request_body_tracking = v;
        }
        if let Some(v) = self.enable_session_tracking {
            config.enable_session_tracking = v;
        }
        if let Some(v) = self.enable_response_tracking {
            config.enable_response_tracking = v;
        }
    }
}

pub fn default_exclude_request_dto_types() -> BTreeSet<RequestDtoType> {
    BTreeSet::from([RequestDtoType::new(RequestDtoType::REQUEST_LOGS)])
}

pub fn default_hide_request_body_types() -> BTreeSet<RequestDtoType> {
    BTreeSet::from([
        RequestDtoType::new(RequestDtoType::AUTHENTICATE),
        RequestDtoType::new(RequestDtoType::REGISTER),
    ])
}
