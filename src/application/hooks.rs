//! Caller-supplied callbacks plugged into the pipeline.

use serde_json::{Map, Value};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::entities::{RequestContext, RequestDto, ResponseOutcome};

/// Returns `true` for raw requests that must never be logged.
pub type SkipLogging = Arc<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// Produces extra properties for an entry.
///
/// Input: request, request DTO, response, request duration.
/// Output: properties merged with get-or-add semantics, so standard fields
/// always win.
pub type PropertyAppender = Arc<
    dyn Fn(Option<&RequestContext>, Option<&RequestDto>, Option<&ResponseOutcome>, Duration) -> Map<String, Value>
        + Send
        + Sync,
>;

/// Taps into every logger invocation before any flag is consulted.
pub type RawLogEvent = Arc<
    dyn Fn(Option<&RequestContext>, Option<&RequestDto>, Option<&ResponseOutcome>, Duration)
        + Send
        + Sync,
>;

/// Builds a [`SkipLogging`] predicate matching raw paths against `pattern`.
///
/// # Errors
///
/// Returns the regex error if `pattern` does not compile.
pub fn skip_paths_matching(pattern: &str) -> Result<SkipLogging, regex::Error> {
    let re = regex::Regex::new(pattern)?;
    Ok(Arc::new(move |req: &RequestContext| re.is_match(&req.path_info)))
}

/// Runs a caller-supplied callback, turning a panic into `None`.
///
/// A failing hook costs its own contribution, never the request or the rest
/// of the entry.
pub(crate) fn guarded<T>(hook: &'static str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(hook, "Request log hook panicked");
            None
        }
    }
}
