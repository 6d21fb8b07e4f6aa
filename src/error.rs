//! Caller-visible errors of the request-logging feature.
//!
//! Delivery failures are not represented here: they stay inside the
//! background task (see [`crate::infrastructure::transport::DeliveryError`]).

use axum::{
    Extension, Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::ErrorDetails;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed settings, detected at build or update time.
    #[error("Configuration error: {message}")]
    Configuration { message: String, details: Value },

    /// An admin update that the feature refuses to apply.
    #[error("Policy rejection: {message}")]
    PolicyRejection { message: String, details: Value },

    #[error("Forbidden: {message}")]
    Forbidden { message: String, details: Value },

    /// The admin endpoint could not locate a request logger.
    #[error("Resolution error: {message}")]
    Resolution { message: String, details: Value },

    #[error("Not supported: {message}")]
    NotSupported { message: String, details: Value },
}

impl AppError {
    pub fn configuration(message: impl Into<String>, details: Value) -> Self {
        Self::Configuration {
            message: message.into(),
            details,
        }
    }
    pub fn policy_rejection(message: impl Into<String>, details: Value) -> Self {
        Self::PolicyRejection {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn resolution(message: impl Into<String>, details: Value) -> Self {
        Self::Resolution {
            message: message.into(),
            details,
        }
    }
    pub fn not_supported(message: impl Into<String>, details: Value) -> Self {
        Self::NotSupported {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::PolicyRejection { .. } => StatusCode::BAD_REQUEST,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Resolution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration { .. } => "configuration_error",
            AppError::PolicyRejection { .. } => "policy_rejection",
            AppError::Forbidden { .. } => "forbidden",
            AppError::Resolution { .. } => "resolution_error",
            AppError::NotSupported { .. } => "not_supported",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let (message, details) = match self {
            AppError::Configuration { message, details }
            | AppError::PolicyRejection { message, details }
            | AppError::Forbidden { message, details }
            | AppError::Resolution { message, details }
            | AppError::NotSupported { message, details } => (message, details),
        };

        // picked up by the request-log middleware
        let error_details = ErrorDetails {
            error_code: code.to_string(),
            message: message.clone(),
            stack_trace: None,
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Extension(error_details), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::policy_rejection("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::forbidden("x", json!({})).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::resolution("x", json!({})).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_includes_message() {
        let err = AppError::configuration("Seq Url is not a valid url", json!({}));
        assert_eq!(err.to_string(), "Configuration error: Seq Url is not a valid url");
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::policy_rejection("nope", json!({})).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let details = response.extensions().get::<ErrorDetails>().unwrap();
        assert_eq!(details.error_code, "policy_rejection");
        assert_eq!(details.message, "nope");
    }
}
