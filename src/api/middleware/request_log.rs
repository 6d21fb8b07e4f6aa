//! Request logging middleware.

use axum::{
    body::{Body, Bytes, HttpBody, to_bytes},
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::application::services::SeqRequestLogger;
use crate::domain::entities::{
    ErrorDetails, ErrorResponse, ExceptionInfo, RequestContext, RequestDto, RequestItems,
    ResponseOutcome, SessionInfo,
};

/// Logs every request passing through the router to Seq.
///
/// # Captured Data
///
/// **Before the handler:**
/// - Method, absolute URI, headers
/// - Client IP from `ConnectInfo` (when served with connect info)
/// - [`RequestItems`] and [`SessionInfo`] extensions set by outer layers
/// - Raw body and urlencoded form fields, only when the logger was built
///   with request-body tracking
///
/// **After the handler:**
/// - [`RequestDto`], [`ErrorDetails`] and [`ExceptionInfo`] response extensions
/// - The JSON response body, while response tracking is enabled
///
/// Bodies are buffered only when their exact length is known and fits in
/// `max_body_bytes`. Streamed, chunked and oversized bodies pass through
/// untouched and are logged without a payload.
///
/// The entry is dispatched in the background; the response is returned
/// without waiting for delivery.
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/hello/{name}", get(hello_handler))
///     .layer(catch_panic::layer())
///     .layer(middleware::from_fn_with_state(logger, request_log::layer));
/// ```
pub async fn layer(
    State(logger): State<Arc<SeqRequestLogger>>,
    req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();

    let mut context = request_context(&req);
    let req = if logger.captures_request_bodies() {
        capture_body(req, logger.max_body_bytes(), &mut context).await
    } else {
        req
    };

    let response = next.run(req).await;

    let request_dto = response.extensions().get::<RequestDto>().cloned();
    let (response, outcome) = response_outcome(&logger, response).await;

    logger.log(
        Some(&context),
        request_dto.as_ref(),
        Some(&outcome),
        started.elapsed(),
    );

    response
}

/// Snapshot of the request head and host-provided extensions.
fn request_context(req: &Request) -> RequestContext {
    let mut context = RequestContext::new(req.method().as_str(), absolute_uri(req));

    context.headers = req
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    context.client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    if let Some(RequestItems(items)) = req.extensions().get::<RequestItems>() {
        context.items = items.clone();
    }

    if let Some(session) = req.extensions().get::<SessionInfo>() {
        context.session_id = session.id.clone();
        context.session = session.data.clone();
    }

    context
}

/// Rebuilds the absolute URI from the `Host` header when the request line
/// only carries the path.
fn absolute_uri(req: &Request) -> String {
    let uri = req.uri();
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    let headers = req.headers();
    let scheme = header_str(headers, "x-forwarded-proto").unwrap_or("http");
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    match header_str(headers, header::HOST.as_str()) {
        Some(host) => format!("{scheme}://{host}{path}"),
        None => path.to_string(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Length of `body` when it is known up front and at most `limit` bytes.
fn bounded_len<B: HttpBody>(body: &B, limit: usize) -> Option<usize> {
    let len = usize::try_from(body.size_hint().exact()?).ok()?;
    (len <= limit).then_some(len)
}

/// Reads a body of known length. A failed read is handed on as a body that
/// fails with the same error.
async fn buffer(body: Body, limit: usize) -> (Body, Option<Bytes>) {
    match to_bytes(body, limit).await {
        Ok(bytes) => (Body::from(bytes.clone()), Some(bytes)),
        Err(e) => {
            warn!(error = %e, "Failed to buffer body for logging");
            let failed = futures::stream::once(async move { Err::<Bytes, _>(e) });
            (Body::from_stream(failed), None)
        }
    }
}

/// Buffers the request body so it can be logged and still reach the handler.
async fn capture_body(req: Request, limit: usize, context: &mut RequestContext) -> Request {
    let Some(len) = bounded_len(req.body(), limit) else {
        debug!(limit, "Request body not captured: length unknown or over limit");
        return req;
    };
    if len == 0 {
        return req;
    }

    let (parts, body) = req.into_parts();
    let (body, bytes) = buffer(body, limit).await;

    if let Some(bytes) = bytes.filter(|b| !b.is_empty()) {
        if is_form(&parts.headers) {
            context.form_data = form_fields(&bytes);
        }
        context.raw_body = Some(String::from_utf8_lossy(&bytes).into_owned());
    }

    Request::from_parts(parts, body)
}

fn is_form(headers: &HeaderMap) -> bool {
    header_str(headers, header::CONTENT_TYPE.as_str())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

fn is_json(headers: &HeaderMap) -> bool {
    header_str(headers, header::CONTENT_TYPE.as_str())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn form_fields(bytes: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

/// Classifies the response and, for tracked successes, captures its JSON body.
async fn response_outcome(
    logger: &SeqRequestLogger,
    response: Response,
) -> (Response, ResponseOutcome) {
    let status = response.status();
    let details = response.extensions().get::<ErrorDetails>().cloned();
    let exception = response.extensions().get::<ExceptionInfo>().cloned();

    if exception.is_some() || details.is_some() || status.is_client_error() || status.is_server_error() {
        let reason = status.canonical_reason().unwrap_or("Error");
        let details = details.unwrap_or_else(|| ErrorDetails {
            error_code: reason.to_string(),
            message: reason.to_string(),
            stack_trace: None,
        });

        let mut error = ErrorResponse::new(status.as_u16(), details.error_code, details.message);
        error.stack_trace = details.stack_trace;
        if let Some(ex) = exception {
            if error.stack_trace.is_none() {
                error.stack_trace = ex.stack_trace.clone();
            }
            error = error.with_exception(ex);
        }

        return (response, ResponseOutcome::Error(error));
    }

    let description = status.canonical_reason().map(str::to_string);
    let limit = logger.max_body_bytes();
    if !logger.config().enable_response_tracking
        || !is_json(response.headers())
        || bounded_len(response.body(), limit).is_none()
    {
        let outcome = ResponseOutcome::Success {
            status: status.as_u16(),
            description,
            body: None,
        };
        return (response, outcome);
    }

    let (parts, body) = response.into_parts();
    let (body, bytes) = buffer(body, limit).await;
    let captured = bytes.and_then(|b| serde_json::from_slice::<Value>(&b).ok());

    let outcome = ResponseOutcome::Success {
        status: status.as_u16(),
        description,
        body: captured,
    };
    (Response::from_parts(parts, body), outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    #[test]
    fn test_absolute_uri_from_host_header() {
        let req = HttpRequest::builder()
            .uri("/hello/world?x=1")
            .header("host", "localhost:3000")
            .body(Body::empty())
            .unwrap();

        assert_eq!(absolute_uri(&req), "http://localhost:3000/hello/world?x=1");
    }

    #[test]
    fn test_absolute_uri_honours_forwarded_proto() {
        let req = HttpRequest::builder()
            .uri("/a")
            .header("host", "api.example.com")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();

        assert_eq!(absolute_uri(&req), "https://api.example.com/a");
    }

    #[test]
    fn test_absolute_uri_without_host() {
        let req = HttpRequest::builder().uri("/a?b").body(Body::empty()).unwrap();
        assert_eq!(absolute_uri(&req), "/a?b");
    }

    #[test]
    fn test_request_context_reads_extensions() {
        let mut items = Map::new();
        items.insert("Tenant".into(), Value::from("acme"));

        let mut req = HttpRequest::builder()
            .method("POST")
            .uri("/hello")
            .header("host", "h")
            .header("referer", "https://example.com")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(RequestItems(items));
        req.extensions_mut().insert(SessionInfo {
            id: Some("s-1".into()),
            data: None,
        });
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4000))));

        let context = request_context(&req);

        assert_eq!(context.method, "POST");
        assert_eq!(context.path_info, "/hello");
        assert_eq!(context.client_ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(context.header("Referer"), Some("https://example.com"));
        assert_eq!(context.items["Tenant"], "acme");
        assert_eq!(context.session_id.as_deref(), Some("s-1"));
    }

    #[test]
    fn test_form_fields() {
        let fields = form_fields(b"name=World&greeting=hi%20there");
        assert_eq!(fields["name"], "World");
        assert_eq!(fields["greeting"], "hi there");
    }

    #[test]
    fn test_bounded_len_requires_exact_size_within_limit() {
        assert_eq!(bounded_len(&Body::from("12345"), 8), Some(5));
        assert_eq!(bounded_len(&Body::from("12345"), 5), Some(5));
        assert_eq!(bounded_len(&Body::from("123456789"), 8), None);

        let streamed = Body::from_stream(futures::stream::iter(vec![Ok::<_, std::io::Error>(
            Bytes::from_static(b"abc"),
        )]));
        assert_eq!(bounded_len(&streamed, 1024), None);
    }

    #[tokio::test]
    async fn test_buffer_keeps_payload_for_the_consumer() {
        let (body, bytes) = buffer(Body::from("{\"a\":1}"), 64).await;

        assert_eq!(bytes.as_deref(), Some(&b"{\"a\":1}"[..]));
        let forwarded = to_bytes(body, 64).await.unwrap();
        assert_eq!(&forwarded[..], b"{\"a\":1}");
    }

    #[tokio::test]
    async fn test_buffer_forwards_read_errors() {
        let failing = Body::from_stream(futures::stream::once(async {
            Err::<Bytes, _>(std::io::Error::other("connection reset"))
        }));

        let (body, bytes) = buffer(failing, 64).await;

        assert!(bytes.is_none());
        assert!(to_bytes(body, 64).await.is_err());
    }
}
