//! In-memory settings store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::settings::SettingsStore;

/// A settings store backed by a map.
///
/// # Use Cases
///
/// - Tests that need a fully controlled configuration
/// - Hosts that load settings from their own source and hand them over
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(self, key: &str, value: &str) -> Self {
        self.set_string(key, value);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemorySettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::keys;

    #[test]
    fn test_set_and_get() {
        let settings = MemorySettings::new();
        assert_eq!(settings.get_string(keys::SEQ_URL), None);

        settings.set_string(keys::SEQ_URL, "http://localhost:5341");
        assert_eq!(
            settings.get_string(keys::SEQ_URL),
            Some("http://localhost:5341".to_string())
        );
    }

    #[test]
    fn test_from_iter_and_with() {
        let settings: MemorySettings = [(keys::ENABLED, "false")].into_iter().collect();
        let settings = settings.with(keys::API_KEY, "k");

        assert_eq!(settings.get_string(keys::ENABLED), Some("false".to_string()));
        assert_eq!(settings.get_string(keys::API_KEY), Some("k".to_string()));
    }
}
