//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with request-logger checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Request logger registered
/// - **503 Service Unavailable**: No request logger registered
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "request_logger": {
///       "status": "ok",
///       "message": "Enabled, 42 requests logged"
///     },
///     "seq": {
///       "status": "ok",
///       "message": "http://localhost:5341/api/events/raw"
///     }
///   }
/// }
/// ```
///
/// Delivery to Seq is fire-and-forget, so the `seq` check only reports the
/// target and never probes it.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (logger_check, seq_check) = match &state.logger {
        Some(logger) => {
            let config = logger.config();
            let logger_check = CheckStatus::ok(format!(
                "{}, {} requests logged",
                if config.enabled { "Enabled" } else { "Disabled" },
                logger.request_count()
            ));
            (logger_check, CheckStatus::ok(logger.transport_target()))
        }
        None => (
            CheckStatus::error("Request logger is not registered"),
            CheckStatus::error("No transport"),
        ),
    };

    let all_healthy = logger_check.is_ok() && seq_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            request_logger: logger_check,
            seq: seq_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
