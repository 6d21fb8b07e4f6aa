//! Handler for the request-log configuration endpoint.

use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::api::dto::config::SeqRequestLogConfig;
use crate::domain::entities::{CallerRoles, RequestDto, RequestDtoType};
use crate::error::AppError;
use crate::state::AppState;

type ConfigResponse = (Extension<RequestDto>, Json<SeqRequestLogConfig>);

/// Reads or updates the feature toggles from query parameters.
///
/// # Endpoint
///
/// `GET /seq-request-log-config?enableSessionTracking=true`
///
/// # Response Codes
///
/// - **200 OK**: Resulting toggle values
/// - **400 Bad Request**: The update violates the response-tracking rule
/// - **403 Forbidden**: Caller has none of the required roles
/// - **500 Internal Server Error**: No request logger registered
pub async fn config_query_handler(
    State(state): State<AppState>,
    caller: Option<Extension<CallerRoles>>,
    Query(req): Query<SeqRequestLogConfig>,
) -> Result<ConfigResponse, AppError> {
    apply(&state, caller.map(|Extension(roles)| roles), req)
}

/// Reads or updates the feature toggles from a JSON body.
///
/// # Endpoint
///
/// `POST /seq-request-log-config`
///
/// # Request Body
///
/// ```json
/// {
///   "enabled": true,
///   "enableSessionTracking": true,
///   "enableRequestBodyTracking": false
/// }
/// ```
///
/// Absent fields are left untouched. Same response codes as
/// [`config_query_handler`].
pub async fn config_handler(
    State(state): State<AppState>,
    caller: Option<Extension<CallerRoles>>,
    Json(req): Json<SeqRequestLogConfig>,
) -> Result<ConfigResponse, AppError> {
    apply(&state, caller.map(|Extension(roles)| roles), req)
}

fn apply(
    state: &AppState,
    caller: Option<CallerRoles>,
    req: SeqRequestLogConfig,
) -> Result<ConfigResponse, AppError> {
    let service = state.config_service()?;
    service.authorize(caller.as_ref())?;

    let dto = RequestDto::of(RequestDtoType::CONFIG, &req);
    let toggles = service.apply(req.into())?;

    Ok((Extension(dto), Json(toggles.into())))
}
