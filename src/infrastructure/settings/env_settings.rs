//! Environment-backed settings store.

use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

use crate::domain::settings::SettingsStore;

/// Maps a settings key to its environment variable name.
///
/// `seq.requestlogs.seq.url` → `SEQ_REQUESTLOGS_SEQ_URL`
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Reads settings from environment variables.
///
/// Writes go to an in-process override map that takes priority over the
/// environment, so the process environment is never mutated.
#[derive(Debug, Default)]
pub struct EnvSettings {
    overrides: RwLock<HashMap<String, String>>,
}

impl EnvSettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for EnvSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        let overridden = self
            .overrides
            .read()
            .ok()
            .and_then(|map| map.get(key).cloned());

        overridden.or_else(|| env::var(env_var_name(key)).ok())
    }

    fn set_string(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.overrides.write() {
            map.insert(key.to_string(), value.to_string());
        }
    }
}
