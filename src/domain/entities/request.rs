//! Request-side data handed to the request logger.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable logical name of a request DTO type.
///
/// Used for the exclusion and body-hiding lists instead of runtime type
/// information. Hosts pick the names; the defaults below match the endpoints
/// the plugin knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestDtoType(String);

impl RequestDtoType {
    /// The host's own request-log query endpoint.
    pub const REQUEST_LOGS: &'static str = "RequestLogs";
    /// Authentication requests (carry credentials).
    pub const AUTHENTICATE: &'static str = "Authenticate";
    /// Registration requests (carry credentials).
    pub const REGISTER: &'static str = "Register";
    /// The plugin's admin configuration endpoint.
    pub const CONFIG: &'static str = "SeqRequestLogConfig";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestDtoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestDtoType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RequestDtoType {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A deserialized request payload together with its logical type.
///
/// Handlers publish it as a response extension so the logging middleware can
/// see the DTO after the request body was consumed:
///
/// ```rust,ignore
/// async fn hello(Json(req): Json<Hello>) -> impl IntoResponse {
///     let dto = RequestDto::of("Hello", &req);
///     (Extension(dto), Json(HelloResponse { .. }))
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDto {
    pub type_id: RequestDtoType,
    pub value: Value,
}

impl RequestDto {
    pub fn new(type_id: impl Into<RequestDtoType>, value: Value) -> Self {
        Self {
            type_id: type_id.into(),
            value,
        }
    }

    /// Serializes `dto` into a [`RequestDto`]; unserializable values become `null`.
    pub fn of<T: Serialize>(type_id: impl Into<RequestDtoType>, dto: &T) -> Self {
        Self::new(type_id, serde_json::to_value(dto).unwrap_or(Value::Null))
    }
}

/// Session data published by the host for the current request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionInfo {
    pub id: Option<String>,
    pub data: Option<Value>,
}

/// Per-request key/value items published by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestItems(pub Map<String, Value>);

/// Roles of the authenticated caller, published by the host's auth layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallerRoles(pub Vec<String>);

impl CallerRoles {
    pub fn has_any(&self, required: &[String]) -> bool {
        required.iter().any(|r| self.0.iter().any(|c| c == r))
    }
}

/// Item keys that duplicate other properties or hold opaque handles.
pub const NOISY_ITEM_KEYS: [&str; 3] = ["__session", "_requestDurationStopwatch", "x-mac-requestId"];

/// Cookie carrying the authenticated user's id when no item is set.
pub const USER_AUTH_ID_KEY: &str = "X-UAId";

/// Snapshot of an inbound HTTP request as seen by the logger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub method: String,
    pub absolute_uri: String,
    pub path_info: String,
    pub client_ip: Option<String>,
    /// Header name/value pairs in arrival order.
    pub headers: Vec<(String, String)>,
    pub items: Map<String, Value>,
    pub session_id: Option<String>,
    pub session: Option<Value>,
    pub form_data: Map<String, Value>,
    pub raw_body: Option<String>,
    /// Set when logging happens after the response stream was closed;
    /// session and form data are no longer readable then.
    pub response_closed: bool,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, absolute_uri: impl Into<String>) -> Self {
        let absolute_uri = absolute_uri.into();
        let path_info = path_of(&absolute_uri);
        Self {
            method: method.into(),
            absolute_uri,
            path_info,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.items.insert(key.into(), value.into());
        self
    }

    pub fn with_form_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.form_data.insert(key.into(), value.into());
        self
    }

    pub fn with_raw_body(mut self, body: impl Into<String>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    pub fn with_session(mut self, id: impl Into<String>, data: Value) -> Self {
        self.session_id = Some(id.into());
        self.session = Some(data);
        self
    }

    /// Get a request header (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Reads a cookie from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k == name).then_some(v)
        })
    }

    /// Items without the keys listed in [`NOISY_ITEM_KEYS`].
    pub fn items_without_noise(&self) -> Map<String, Value> {
        self.items
            .iter()
            .filter(|(k, _)| !NOISY_ITEM_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The authenticated user id from the request items, falling back to the cookie.
    pub fn user_auth_id(&self) -> Option<String> {
        if let Some(v) = self.items.get(USER_AUTH_ID_KEY) {
            return match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            };
        }
        self.cookie(USER_AUTH_ID_KEY).map(str::to_string)
    }
}

/// Extracts the path component from an absolute or origin-form URI.
fn path_of(uri: &str) -> String {
    let without_query = uri.split(['?', '#']).next().unwrap_or_default();
    let path = match without_query.find("://") {
        Some(scheme_end) => {
            let rest = &without_query[scheme_end + 3..];
            rest.find('/').map(|i| &rest[i..]).unwrap_or("/")
        }
        None => without_query,
    };
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
