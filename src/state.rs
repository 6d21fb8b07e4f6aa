//! Shared state for the HTTP handlers.

use serde_json::json;
use std::sync::Arc;

use crate::application::services::{ConfigService, SeqRequestLogger};
use crate::error::AppError;

/// State injected into the admin and health handlers.
///
/// The logger is optional so a host can mount the admin routes before the
/// feature is built; requests then fail with a resolution error.
#[derive(Clone, Default)]
pub struct AppState {
    pub logger: Option<Arc<SeqRequestLogger>>,
}

impl AppState {
    pub fn new(logger: Arc<SeqRequestLogger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    /// The registered request logger.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Resolution`] if no logger was registered.
    pub fn logger(&self) -> Result<&Arc<SeqRequestLogger>, AppError> {
        self.logger.as_ref().ok_or_else(|| {
            AppError::resolution(
                "Could not resolve the Seq request logger",
                json!({ "reason": "feature not registered" }),
            )
        })
    }

    pub fn config_service(&self) -> Result<ConfigService, AppError> {
        Ok(ConfigService::new(Arc::clone(self.logger()?)))
    }
}
