//! Runtime changes to the feature toggles.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::request_logger::SeqRequestLogger;
use crate::domain::entities::{CallerRoles, FeatureConfig, FeatureToggles, FeatureTogglesPatch};
use crate::error::AppError;

/// Applies toggle updates coming from the admin endpoint.
pub struct ConfigService {
    logger: Arc<SeqRequestLogger>,
}

impl ConfigService {
    pub fn new(logger: Arc<SeqRequestLogger>) -> Self {
        Self { logger }
    }

    pub fn current(&self) -> FeatureToggles {
        FeatureToggles::from(&*self.logger.config())
    }

    /// Checks the caller against the configured required roles.
    ///
    /// Callers without attached roles are not checked; role enforcement
    /// only applies once the host's auth layer publishes [`CallerRoles`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the caller has none of the roles.
    pub fn authorize(&self, caller: Option<&CallerRoles>) -> Result<(), AppError> {
        let config = self.logger.config();
        if config.required_roles.is_empty() {
            return Ok(());
        }

        match caller {
            Some(roles) if !roles.has_any(&config.required_roles) => Err(AppError::forbidden(
                "Caller lacks the roles required to change request logging",
                json!({ "requiredRoles": config.required_roles }),
            )),
            _ => Ok(()),
        }
    }

    /// Applies `patch` and returns the resulting toggles.
    ///
    /// An empty patch is a read.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PolicyRejection`] when response tracking is turned
    /// on while request-body tracking is on and response tracking was not
    /// enabled at startup.
    pub fn apply(&self, patch: FeatureTogglesPatch) -> Result<FeatureToggles, AppError> {
        if patch.is_empty() {
            return Ok(self.current());
        }

        let startup_response_tracking = self.logger.startup_config().enable_response_tracking;
        let updated = self.logger.try_update_config(|current| {
            check_response_tracking(current, &patch, startup_response_tracking)?;
            let mut next = current.clone();
            patch.apply_to(&mut next);
            Ok(next)
        })?;

        let toggles = FeatureToggles::from(&*updated);
        info!(?toggles, "Request logging configuration updated");
        Ok(toggles)
    }
}

fn check_response_tracking(
    current: &FeatureConfig,
    patch: &FeatureTogglesPatch,
    startup_response_tracking: bool,
) -> Result<(), AppError> {
    if patch.enable_response_tracking != Some(true) || startup_response_tracking {
        return Ok(());
    }

    let body_tracking = patch
        .enable_request_body_tracking
        .unwrap_or(current.enable_request_body_tracking);
    if !body_tracking {
        return Ok(());
    }

    Err(AppError::policy_rejection(
        "Response tracking cannot be enabled together with request body tracking unless it was enabled at startup",
        json!({
            "enableResponseTracking": true,
            "enableRequestBodyTracking": body_tracking,
        }),
    ))
}
