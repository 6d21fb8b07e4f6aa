//! Construction of request log entries.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::application::hooks::{PropertyAppender, guarded};
use crate::domain::entities::log_entry::REQUEST_MESSAGE_TEMPLATE;
use crate::domain::entities::{
    FeatureConfig, LogEntry, RequestContext, RequestDto, ResponseOutcome,
};
use crate::domain::request_counter::RequestCounter;

/// Default cap on captured body text, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds [`LogEntry`] values from a finished request.
///
/// # Property order
///
/// Every step uses get-or-add, so the earliest writer of a key wins:
///
/// 1. Timing and correlation (`IsRequestLog`, `ElapsedMilliseconds`, `Elapsed`, `RequestCount`)
/// 2. Request fields (method, URI, client, status, session, items)
/// 3. Request payload (`RequestDto`, `FormData`, `RequestBody`) unless hidden
/// 4. Response payload or error details
/// 5. Properties from the caller's [`PropertyAppender`]
/// 6. Remaining headers as `Header-<name>`
pub struct EntryBuilder {
    counter: Arc<RequestCounter>,
    append_properties: Option<PropertyAppender>,
    max_body_bytes: usize,
}

impl EntryBuilder {
    pub fn new(counter: Arc<RequestCounter>) -> Self {
        Self {
            counter,
            append_properties: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_append_properties(mut self, appender: Option<PropertyAppender>) -> Self {
        self.append_properties = appender;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn build_entry(
        &self,
        config: &FeatureConfig,
        request: Option<&RequestContext>,
        request_dto: Option<&RequestDto>,
        response: Option<&ResponseOutcome>,
        duration: Duration,
    ) -> LogEntry {
        let mut entry = LogEntry::new();
        entry.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));

        let elapsed_ms = duration.as_micros() as f64 / 1000.0;
        entry.get_or_add("IsRequestLog", true);
        entry.get_or_add("ElapsedMilliseconds", elapsed_ms);
        entry.get_or_add("Elapsed", elapsed_ms.round() as u64);
        entry.get_or_add("RequestCount", self.counter.next());

        if let Some(req) = request {
            self.add_request_fields(&mut entry, config, req, response);
        }

        let dto_type = request_dto.map(|d| &d.type_id);
        if !config.is_body_hidden(dto_type) {
            self.add_request_payload(&mut entry, config, request, request_dto);
        }

        if let Some(outcome) = response {
            self.add_outcome(&mut entry, config, outcome);
        }

        if let Some(appender) = &self.append_properties {
            let props = guarded("append_properties", || {
                appender(request, request_dto, response, duration)
            });
            for (key, value) in props.unwrap_or_default() {
                entry.get_or_add(key, value);
            }
        }

        if let Some(req) = request {
            for (name, value) in &req.headers {
                if entry.contains_string_value(value) {
                    continue;
                }
                entry.get_or_add(format!("Header-{name}"), value.as_str());
            }
        }

        entry
    }

    fn add_request_fields(
        &self,
        entry: &mut LogEntry,
        config: &FeatureConfig,
        req: &RequestContext,
        response: Option<&ResponseOutcome>,
    ) {
        entry.message_template = REQUEST_MESSAGE_TEMPLATE.to_string();

        entry.get_or_add("HttpMethod", req.method.as_str());
        entry.get_or_add("AbsoluteUri", req.absolute_uri.as_str());
        entry.get_or_add("PathInfo", req.path_info.as_str());
        entry.get_or_add_opt("IpAddress", req.client_ip.as_deref());
        entry.get_or_add_opt("ForwardedFor", req.header("x-forwarded-for"));
        entry.get_or_add_opt("Referer", req.header("referer"));
        entry.get_or_add_opt("UserAuthId", req.user_auth_id());

        if let Some(outcome) = response {
            entry.get_or_add("StatusCode", outcome.status());
            entry.get_or_add_opt("StatusDescription", outcome.description());
            entry.get_or_add("Outcome", outcome.summary());
        }

        if config.enable_session_tracking && !req.response_closed {
            entry.get_or_add_opt("SessionId", req.session_id.as_deref());
            entry.get_or_add_opt("Session", req.session.clone());
        }

        let items = req.items_without_noise();
        if !items.is_empty() {
            entry.get_or_add("Items", Value::Object(items));
        }
    }

    fn add_request_payload(
        &self,
        entry: &mut LogEntry,
        config: &FeatureConfig,
        request: Option<&RequestContext>,
        request_dto: Option<&RequestDto>,
    ) {
        if let Some(dto) = request_dto {
            entry.get_or_add("RequestDto", dto.value.clone());
        }

        let Some(req) = request else {
            return;
        };
        if req.response_closed {
            return;
        }

        if !req.form_data.is_empty() {
            entry.get_or_add("FormData", Value::Object(req.form_data.clone()));
        }

        if config.enable_request_body_tracking
            && let Some(body) = &req.raw_body
        {
            entry.get_or_add("RequestBody", truncate_utf8(body, self.max_body_bytes));
        }
    }

    fn add_outcome(&self, entry: &mut LogEntry, config: &FeatureConfig, outcome: &ResponseOutcome) {
        entry.level = outcome.level();

        match outcome {
            ResponseOutcome::Success { body, .. } => {
                if config.enable_response_tracking
                    && let Some(body) = body
                {
                    entry.get_or_add("ResponseDto", body.clone());
                }
            }
            ResponseOutcome::Error(error) => {
                if !config.enable_error_tracking {
                    return;
                }

                entry.get_or_add("ErrorCode", error.error_code.as_str());
                entry.get_or_add("ErrorMessage", error.message.as_str());
                entry.get_or_add_opt("StackTrace", error.stack_trace.as_deref());

                if let Some(ex) = error.primary_exception() {
                    entry.exception = Some(ex.to_string());
                    entry.get_or_add_opt("ExceptionSource", ex.source.as_deref());
                    if !ex.data.is_empty() {
                        entry.get_or_add("ExceptionData", Value::Object(ex.data.clone()));
                    }
                }
            }
        }
    }
}

/// Cuts `text` to at most `max` bytes on a char boundary.
fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
