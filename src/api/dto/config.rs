//! DTOs for the request-log configuration endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{FeatureToggles, FeatureTogglesPatch};

/// Request and response body of `/seq-request-log-config`.
///
/// On requests, absent fields leave the current value untouched. Responses
/// always carry every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeqRequestLogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_session_tracking: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_request_body_tracking: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_response_tracking: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_error_tracking: Option<bool>,
}

impl From<SeqRequestLogConfig> for FeatureTogglesPatch {
    fn from(dto: SeqRequestLogConfig) -> Self {
        Self {
            enabled: dto.enabled,
            enable_error_tracking: dto.enable_error_tracking,
            enable_request_body_tracking: dto.enable_request_body_tracking,
            enable_session_tracking: dto.enable_session_tracking,
            enable_response_tracking: dto.enable_response_tracking,
        }
    }
}

impl From<FeatureToggles> for SeqRequestLogConfig {
    fn from(toggles: FeatureToggles) -> Self {
        Self {
            enabled: Some(toggles.enabled),
            enable_session_tracking: Some(toggles.enable_session_tracking),
            enable_request_body_tracking: Some(toggles.enable_request_body_tracking),
            enable_response_tracking: Some(toggles.enable_response_tracking),
            enable_error_tracking: Some(toggles.enable_error_tracking),
        }
    }
}
