//! Response-side data handed to the request logger.

use serde_json::{Map, Value};
use std::fmt;

use super::log_entry::Level;

/// Details of an unhandled exception (a handler panic or a host-side failure).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExceptionInfo {
    pub type_name: String,
    pub message: String,
    /// Component that raised the exception.
    pub source: Option<String>,
    pub stack_trace: Option<String>,
    pub data: Map<String, Value>,
    pub inner: Option<Box<ExceptionInfo>>,
}

impl ExceptionInfo {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_inner(mut self, inner: ExceptionInfo) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)?;
        if let Some(inner) = &self.inner {
            write!(f, " ---> {inner}")?;
        }
        if let Some(trace) = &self.stack_trace {
            write!(f, "\n{trace}")?;
        }
        Ok(())
    }
}

/// Error details published by a handler alongside a failing response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorDetails {
    pub error_code: String,
    pub message: String,
    pub stack_trace: Option<String>,
}

/// A response that represents a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status: u16,
    pub error_code: String,
    pub message: String,
    pub stack_trace: Option<String>,
    pub exception: Option<ExceptionInfo>,
}

impl ErrorResponse {
    pub fn new(status: u16, error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: error_code.into(),
            message: message.into(),
            stack_trace: None,
            exception: None,
        }
    }

    /// Wraps an unhandled exception as a `500` error response.
    pub fn from_exception(exception: ExceptionInfo) -> Self {
        Self {
            status: 500,
            error_code: exception.type_name.clone(),
            message: exception.message.clone(),
            stack_trace: exception.stack_trace.clone(),
            exception: Some(exception),
        }
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    /// The exception to report: the inner cause when there is one.
    pub fn primary_exception(&self) -> Option<&ExceptionInfo> {
        let ex = self.exception.as_ref()?;
        Some(ex.inner.as_deref().unwrap_or(ex))
    }
}

/// Outcome of a request as seen by the logger.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Success {
        status: u16,
        description: Option<String>,
        body: Option<Value>,
    },
    Error(ErrorResponse),
}

impl ResponseOutcome {
    pub fn ok(body: Option<Value>) -> Self {
        ResponseOutcome::Success {
            status: 200,
            description: Some("OK".to_string()),
            body,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ResponseOutcome::Success { status, .. } => *status,
            ResponseOutcome::Error(e) => e.status,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseOutcome::Error(_))
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ResponseOutcome::Success { description, .. } => description.as_deref(),
            ResponseOutcome::Error(e) => axum::http::StatusCode::from_u16(e.status)
                .ok()
                .and_then(|status| status.canonical_reason()),
        }
    }

    /// Severity implied by this outcome.
    pub fn level(&self) -> Level {
        match self {
            ResponseOutcome::Success { .. } => Level::Debug,
            ResponseOutcome::Error(e) if e.exception.is_some() => Level::Error,
            ResponseOutcome::Error(e) => match Level::from_status(e.status) {
                // an error response below 400 still is an error
                Level::Debug => Level::Error,
                level => level,
            },
        }
    }

    /// Short outcome summary used for the `Outcome` property.
    pub fn summary(&self) -> &'static str {
        match self {
            ResponseOutcome::Success { .. } => "Success",
            ResponseOutcome::Error(e) if e.exception.is_some() => "Exception",
            ResponseOutcome::Error(e) if (400..500).contains(&e.status) => "ClientError",
            ResponseOutcome::Error(_) => "ServerError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_description_uses_status_reason() {
        let error = ResponseOutcome::Error(ErrorResponse::new(400, "Validation", "name is required"));
        assert_eq!(error.description(), Some("Bad Request"));

        let unknown = ResponseOutcome::Error(ErrorResponse::new(599, "Custom", "odd status"));
        assert_eq!(unknown.description(), None);
    }

    #[test]
    fn test_outcome_levels() {
        assert_eq!(ResponseOutcome::ok(None).level(), Level::Debug);

        let redirect = ResponseOutcome::Success {
            status: 302,
            description: None,
            body: None,
        };
        assert_eq!(redirect.level(), Level::Debug);

        let not_found = ResponseOutcome::Error(ErrorResponse::new(404, "NotFound", "missing"));
        assert_eq!(not_found.level(), Level::Warning);
        assert_eq!(not_found.summary(), "ClientError");

        let server = ResponseOutcome::Error(ErrorResponse::new(502, "BadGateway", "upstream"));
        assert_eq!(server.level(), Level::Error);
        assert_eq!(server.summary(), "ServerError");

        let ex = ResponseOutcome::Error(ErrorResponse::from_exception(ExceptionInfo::new(
            "panic", "boom",
        )));
        assert_eq!(ex.level(), Level::Error);
        assert_eq!(ex.summary(), "Exception");
        assert_eq!(ex.status(), 500);
    }

    #[test]
    fn test_exception_with_client_status_is_error() {
        let err = ErrorResponse::new(400, "Invalid", "bad input")
            .with_exception(ExceptionInfo::new("ArgumentError", "bad input"));
        assert_eq!(ResponseOutcome::Error(err).level(), Level::Error);
    }

    #[test]
    fn test_primary_exception_prefers_inner() {
        let inner = ExceptionInfo::new("IoError", "disk full").with_source("storage");
        let err = ErrorResponse::from_exception(
            ExceptionInfo::new("ServiceError", "save failed").with_inner(inner.clone()),
        );
        assert_eq!(err.primary_exception(), Some(&inner));

        let plain = ErrorResponse::from_exception(ExceptionInfo::new("ServiceError", "oops"));
        assert_eq!(plain.primary_exception().unwrap().message, "oops");

        let none = ErrorResponse::new(500, "Internal", "x");
        assert!(none.primary_exception().is_none());
    }

    #[test]
    fn test_exception_display() {
        let ex = ExceptionInfo::new("ServiceError", "save failed")
            .with_inner(ExceptionInfo::new("IoError", "disk full"))
            .with_stack_trace("at save()");
        assert_eq!(
            ex.to_string(),
            "ServiceError: save failed ---> IoError: disk full\nat save()"
        );
    }
}
