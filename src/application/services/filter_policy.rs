//! Decides whether a request is logged at all.

use crate::application::hooks::{SkipLogging, guarded};
use crate::domain::entities::{FeatureConfig, RequestContext, RequestDtoType};

/// Gate evaluated before an entry is built.
///
/// Body hiding and the tracking toggles are not decided here; the
/// [`crate::application::services::EntryBuilder`] applies them per property.
#[derive(Clone, Default)]
pub struct FilterPolicy {
    skip_logging: Option<SkipLogging>,
}

impl FilterPolicy {
    pub fn new(skip_logging: Option<SkipLogging>) -> Self {
        Self { skip_logging }
    }

    /// Returns `false` when the request must not be logged:
    ///
    /// 1. the skip predicate matches the raw request
    /// 2. logging is disabled
    /// 3. the DTO type is in the exclusion list
    pub fn should_log(
        &self,
        config: &FeatureConfig,
        request: Option<&RequestContext>,
        dto_type: Option<&RequestDtoType>,
    ) -> bool {
        if let (Some(skip), Some(req)) = (&self.skip_logging, request)
            && guarded("skip_logging", || skip(req)).unwrap_or(false)
        {
            return false;
        }

        if !config.enabled {
            return false;
        }

        !config.is_excluded(dto_type)
    }
}

impl std::fmt::Debug for FilterPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPolicy")
            .field("skip_logging", &self.skip_logging.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SeqUrl;
    use std::sync::Arc;

    fn config() -> FeatureConfig {
        FeatureConfig::new(SeqUrl::parse("http://localhost:5341").unwrap())
    }

    #[test]
    fn test_logs_by_default() {
        let policy = FilterPolicy::default();
        let req = RequestContext::new("GET", "http://h/hello");

        assert!(policy.should_log(&config(), Some(&req), Some(&"Hello".into())));
        assert!(policy.should_log(&config(), None, None));
    }

    #[test]
    fn test_disabled_skips_everything() {
        let mut config = config();
        config.enabled = false;

        let policy = FilterPolicy::default();
        assert!(!policy.should_log(&config, None, None));
        assert!(!policy.should_log(
            &config,
            Some(&RequestContext::new("GET", "http://h/")),
            Some(&"Hello".into())
        ));
    }

    #[test]
    fn test_excluded_types_skip_regardless_of_toggles() {
        let policy = FilterPolicy::default();
        let excluded: RequestDtoType = "RequestLogs".into();

        for bits in 0u8..16 {
            let mut config = config();
            config.enable_error_tracking = bits & 1 != 0;
            config.enable_request_body_tracking = bits & 2 != 0;
            config.enable_session_tracking = bits & 4 != 0;
            config.enable_response_tracking = bits & 8 != 0;

            assert!(!policy.should_log(&config, None, Some(&excluded)));
        }
    }

    #[test]
    fn test_skip_predicate_matches_raw_request() {
        let policy = FilterPolicy::new(Some(Arc::new(|req: &RequestContext| {
            req.path_info == "/ignore"
        })));

        let ignored = RequestContext::new("GET", "http://h/ignore");
        let any = RequestContext::new("GET", "http://h/any");

        assert!(!policy.should_log(&config(), Some(&ignored), None));
        assert!(policy.should_log(&config(), Some(&any), None));
        // no raw request, nothing to match against
        assert!(policy.should_log(&config(), None, None));
    }

    #[test]
    fn test_panicking_skip_predicate_still_logs() {
        let policy = FilterPolicy::new(Some(Arc::new(|req: &RequestContext| {
            if req.path_info == "/boom" {
                panic!("skip predicate failed");
            }
            false
        })));

        let req = RequestContext::new("GET", "http://h/boom");
        assert!(policy.should_log(&config(), Some(&req), None));
    }
}
