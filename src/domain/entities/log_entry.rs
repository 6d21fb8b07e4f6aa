//! Log entry entity shipped to the Seq raw ingestion endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Message template used when no request is attached to the entry.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "SeqRequestLogs request";

/// Message template used once the builder has request data.
///
/// Seq renders `{ElapsedMilliseconds:0}` rounded to a whole number while the
/// property keeps its full precision.
pub const REQUEST_MESSAGE_TEMPLATE: &str =
    "HTTP {HttpMethod} {PathInfo} responded {StatusCode} in {ElapsedMilliseconds:0} ms";

/// Severity of a request log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Debug,
    Warning,
    Error,
}

impl Level {
    /// Classifies an HTTP status code.
    ///
    /// - `400..=499` → [`Level::Warning`]
    /// - `500..` → [`Level::Error`]
    /// - anything else → [`Level::Debug`]
    pub fn from_status(status: u16) -> Self {
        match status {
            400..=499 => Level::Warning,
            500.. => Level::Error,
            _ => Level::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "Debug",
            Level::Warning => "Warning",
            Level::Error => "Error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured request log event.
///
/// Field names are serialized in PascalCase exactly as Seq expects them.
/// `Timestamp` and `Exception` are omitted while unset.
///
/// Properties keep insertion order and follow get-or-add semantics: once a
/// key is present, later writers cannot replace it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    properties: Map<String, Value>,
    pub message_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            timestamp: None,
            level: Level::Debug,
            properties: Map::new(),
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            exception: None,
        }
    }
}

impl LogEntry {
    /// Creates an empty entry with the default level and message template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns `true` when the value was inserted.
    pub fn get_or_add(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.properties.contains_key(&key) {
            return false;
        }
        self.properties.insert(key, value.into());
        true
    }

    /// Like [`LogEntry::get_or_add`] but skips `None` values entirely.
    pub fn get_or_add_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) -> bool {
        match value {
            Some(v) => self.get_or_add(key, v),
            None => false,
        }
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Returns true if any property holds exactly `value` as a string.
    pub fn contains_string_value(&self, value: &str) -> bool {
        self.properties
            .values()
            .any(|v| v.as_str().is_some_and(|s| s == value))
    }
}
