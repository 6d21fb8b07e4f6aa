//! The request logger: filter, build, dispatch.

use arc_swap::ArcSwap;
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

use super::entry_builder::{DEFAULT_MAX_BODY_BYTES, EntryBuilder};
use super::filter_policy::FilterPolicy;
use crate::application::hooks::{PropertyAppender, RawLogEvent, SkipLogging, guarded};
use crate::domain::entities::{FeatureConfig, LogEntry, RequestContext, RequestDto, ResponseOutcome};
use crate::domain::request_counter::RequestCounter;
use crate::error::AppError;
use crate::infrastructure::transport::LogTransport;

const SKIPPED_TOTAL: &str = "seq_request_logs_skipped_total";
const DISPATCHED_TOTAL: &str = "seq_request_logs_dispatched_total";
const DELIVERED_TOTAL: &str = "seq_request_logs_delivered_total";
const FAILED_TOTAL: &str = "seq_request_logs_failed_total";

/// Request logger invoked once per finished request.
///
/// Holds the current [`FeatureConfig`] snapshot in an [`ArcSwap`]; each call
/// to [`SeqRequestLogger::log`] reads one snapshot and never blocks on
/// delivery.
///
/// # Example
///
/// ```rust,ignore
/// let logger = SeqRequestLogger::new(config, transport, Arc::new(RequestCounter::new()))
///     .with_skip_logging(Some(skip_paths_matching("^/health$")?));
///
/// logger.log(Some(&request), None, Some(&ResponseOutcome::ok(None)), elapsed);
/// ```
pub struct SeqRequestLogger {
    config: ArcSwap<FeatureConfig>,
    startup: Arc<FeatureConfig>,
    policy: FilterPolicy,
    builder: EntryBuilder,
    counter: Arc<RequestCounter>,
    transport: Arc<dyn LogTransport>,
    raw_log_event: Option<RawLogEvent>,
    max_body_bytes: usize,
}

impl SeqRequestLogger {
    pub fn new(
        config: FeatureConfig,
        transport: Arc<dyn LogTransport>,
        counter: Arc<RequestCounter>,
    ) -> Self {
        let startup = Arc::new(config);
        Self {
            config: ArcSwap::new(Arc::clone(&startup)),
            startup,
            policy: FilterPolicy::default(),
            builder: EntryBuilder::new(Arc::clone(&counter)),
            counter,
            transport,
            raw_log_event: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_skip_logging(mut self, skip_logging: Option<SkipLogging>) -> Self {
        self.policy = FilterPolicy::new(skip_logging);
        self
    }

    pub fn with_append_properties(mut self, appender: Option<PropertyAppender>) -> Self {
        self.builder = self.builder.with_append_properties(appender);
        self
    }

    pub fn with_raw_log_event(mut self, hook: Option<RawLogEvent>) -> Self {
        self.raw_log_event = hook;
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self.builder = self.builder.with_max_body_bytes(max_body_bytes);
        self
    }

    /// The snapshot new requests will see.
    pub fn config(&self) -> Arc<FeatureConfig> {
        self.config.load_full()
    }

    /// The configuration the logger was built with.
    pub fn startup_config(&self) -> &FeatureConfig {
        &self.startup
    }

    /// Replaces the snapshot with the result of `f`, unless `f` rejects it.
    ///
    /// `f` may run more than once when updates race; it always sees the
    /// latest snapshot.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`; the snapshot is left unchanged.
    pub fn try_update_config<F>(&self, mut f: F) -> Result<Arc<FeatureConfig>, AppError>
    where
        F: FnMut(&FeatureConfig) -> Result<FeatureConfig, AppError>,
    {
        let mut outcome = None;
        self.config.rcu(|current| match f(&**current) {
            Ok(next) => {
                let next = Arc::new(next);
                outcome = Some(Ok(Arc::clone(&next)));
                next
            }
            Err(e) => {
                outcome = Some(Err(e));
                Arc::clone(current)
            }
        });

        outcome.unwrap_or_else(|| Ok(self.config.load_full()))
    }

    pub fn update_config<F>(&self, mut f: F) -> Arc<FeatureConfig>
    where
        F: FnMut(&mut FeatureConfig),
    {
        let mut last = None;
        self.config.rcu(|current| {
            let mut next = FeatureConfig::clone(current);
            f(&mut next);
            let next = Arc::new(next);
            last = Some(Arc::clone(&next));
            next
        });

        last.unwrap_or_else(|| self.config.load_full())
    }

    /// Logs one finished request.
    ///
    /// Runs the raw log-event hook, then the filter policy, then builds the
    /// entry and hands it to a background delivery task. Returns the task
    /// handle when an entry was dispatched.
    pub fn log(
        &self,
        request: Option<&RequestContext>,
        request_dto: Option<&RequestDto>,
        response: Option<&ResponseOutcome>,
        duration: Duration,
    ) -> Option<JoinHandle<()>> {
        if let Some(hook) = &self.raw_log_event {
            guarded("raw_log_event", || hook(request, request_dto, response, duration));
        }

        let config = self.config.load();
        if !self
            .policy
            .should_log(&config, request, request_dto.map(|d| &d.type_id))
        {
            counter!(SKIPPED_TOTAL).increment(1);
            return None;
        }

        let entry = self
            .builder
            .build_entry(&config, request, request_dto, response, duration);
        self.dispatch(entry)
    }

    pub fn should_log(&self, request: Option<&RequestContext>, request_dto: Option<&RequestDto>) -> bool {
        self.policy
            .should_log(&self.config.load(), request, request_dto.map(|d| &d.type_id))
    }

    pub fn build_entry(
        &self,
        request: Option<&RequestContext>,
        request_dto: Option<&RequestDto>,
        response: Option<&ResponseOutcome>,
        duration: Duration,
    ) -> LogEntry {
        self.builder
            .build_entry(&self.config.load(), request, request_dto, response, duration)
    }

    /// Ships `entry` on a spawned task. Failures are logged and counted.
    ///
    /// Outside a Tokio runtime the entry is dropped.
    pub fn dispatch(&self, entry: LogEntry) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No Tokio runtime available, dropping request log entry");
            counter!(FAILED_TOTAL).increment(1);
            return None;
        };

        counter!(DISPATCHED_TOTAL).increment(1);
        let transport = Arc::clone(&self.transport);

        Some(runtime.spawn(async move {
            match transport.send(&entry).await {
                Ok(()) => counter!(DELIVERED_TOTAL).increment(1),
                Err(e) => {
                    counter!(FAILED_TOTAL).increment(1);
                    warn!(seq = %transport.target(), error = %e, "Failed to deliver request log");
                }
            }
        }))
    }

    /// Reading logs back is not supported; they live in Seq.
    pub fn latest_logs(&self, _take: Option<usize>) -> Result<Vec<LogEntry>, AppError> {
        Err(AppError::not_supported(
            "Request logs are stored in Seq, query them there",
            json!({ "seqUrl": self.config.load().seq_url.to_string() }),
        ))
    }

    /// Number of entries built so far.
    pub fn request_count(&self) -> u64 {
        self.counter.current()
    }

    /// Whether request bodies are buffered for logging.
    ///
    /// Decided once at startup: turning body tracking on at runtime only
    /// takes effect for hosts built with it enabled.
    pub fn captures_request_bodies(&self) -> bool {
        self.startup.enable_request_body_tracking
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn transport_target(&self) -> String {
        self.transport.target()
    }
}

impl std::fmt::Debug for SeqRequestLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeqRequestLogger")
            .field("config", &*self.config.load_full())
            .field("policy", &self.policy)
            .field("transport", &self.transport.target())
            .finish()
    }
}
