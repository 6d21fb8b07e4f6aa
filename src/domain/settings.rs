//! Settings store contract and the keys the feature reads.

/// Prefix shared by every key of this feature.
pub const KEY_PREFIX: &str = "seq.requestlogs.";

/// Fully qualified settings keys.
pub mod keys {
    pub const SEQ_URL: &str = "seq.requestlogs.seq.url";
    pub const API_KEY: &str = "seq.requestlogs.seq.apikey";
    pub const ENABLED: &str = "seq.requestlogs.enabled";
    pub const ERROR_TRACKING: &str = "seq.requestlogs.errortracking.enabled";
    pub const REQUEST_BODY_TRACKING: &str = "seq.requestlogs.requestbodytracking.enabled";
    pub const SESSION_TRACKING: &str = "seq.requestlogs.sessiontracking.enabled";
    pub const RESPONSE_TRACKING: &str = "seq.requestlogs.responsetracking.enabled";
    pub const REQUIRED_ROLES: &str = "seq.requestlogs.requiredroles";

    pub const ALL: [&str; 8] = [
        SEQ_URL,
        API_KEY,
        ENABLED,
        ERROR_TRACKING,
        REQUEST_BODY_TRACKING,
        SESSION_TRACKING,
        RESPONSE_TRACKING,
        REQUIRED_ROLES,
    ];
}

/// A string key-value settings backing store.
///
/// # Implementations
///
/// - [`crate::infrastructure::settings::EnvSettings`] - Environment variables
/// - [`crate::infrastructure::settings::MemorySettings`] - In-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&self, key: &str, value: &str);
}

/// Parses the boolean spellings accepted in settings values.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_share_prefix() {
        for key in keys::ALL {
            assert!(key.starts_with(KEY_PREFIX), "{key} is missing the prefix");
        }
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }
}
