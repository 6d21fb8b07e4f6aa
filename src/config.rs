//! Service configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Seq settings
//!
//! The request-logging feature reads its own settings through
//! [`crate::infrastructure::settings::EnvSettings`]:
//!
//! ```bash
//! export SEQ_REQUESTLOGS_SEQ_URL="http://localhost:5341"
//! export SEQ_REQUESTLOGS_SEQ_APIKEY="..."                 # Optional
//! export SEQ_REQUESTLOGS_ENABLED="true"
//! export SEQ_REQUESTLOGS_ERRORTRACKING_ENABLED="true"
//! export SEQ_REQUESTLOGS_REQUESTBODYTRACKING_ENABLED="false"
//! export SEQ_REQUESTLOGS_SESSIONTRACKING_ENABLED="false"
//! export SEQ_REQUESTLOGS_RESPONSETRACKING_ENABLED="false"
//! export SEQ_REQUESTLOGS_REQUIREDROLES="admin,ops"        # Optional
//! ```
//!
//! ## Service variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `SEQ_REQUESTLOGS_TIMEOUT_SECS` - Timeout of one POST to Seq (default: 10, range: 1-300)
//! - `SEQ_REQUESTLOGS_MAX_BODY_BYTES` - Cap on logged body text (default: 65536, min: 1024)
//! - `SEQ_REQUESTLOGS_SKIP_PATHS` - Regex of request paths that are never logged (optional)

use anyhow::{Context, Result};
use std::env;

use crate::application::services::SettingsResolver;
use crate::application::services::entry_builder::DEFAULT_MAX_BODY_BYTES;
use crate::infrastructure::transport::DEFAULT_TIMEOUT_SECS;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Timeout (seconds) of a single delivery to Seq.
    pub timeout_secs: u64,
    /// Request bodies longer than this are truncated in the log entry.
    pub max_body_bytes: usize,
    /// Raw request paths matching this regex are never logged.
    pub skip_paths: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not a number.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let timeout_secs = match env::var("SEQ_REQUESTLOGS_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .context("SEQ_REQUESTLOGS_TIMEOUT_SECS must be a number")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let max_body_bytes = match env::var("SEQ_REQUESTLOGS_MAX_BODY_BYTES") {
            Ok(v) => v
                .parse()
                .context("SEQ_REQUESTLOGS_MAX_BODY_BYTES must be a number")?,
            Err(_) => DEFAULT_MAX_BODY_BYTES,
        };

        let skip_paths = env::var("SEQ_REQUESTLOGS_SKIP_PATHS")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            timeout_secs,
            max_body_bytes,
            skip_paths,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `timeout_secs` is outside 1-300
    /// - `max_body_bytes` is below 1024
    /// - `skip_paths` is not a valid regex
    pub fn validate(&self) -> Result<()> {
        // Validate log format
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        // Validate listen address format
        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            anyhow::bail!(
                "SEQ_REQUESTLOGS_TIMEOUT_SECS must be between 1 and 300, got {}",
                self.timeout_secs
            );
        }

        if self.max_body_bytes < 1024 {
            anyhow::bail!(
                "SEQ_REQUESTLOGS_MAX_BODY_BYTES must be at least 1024, got {}",
                self.max_body_bytes
            );
        }

        if let Some(ref pattern) = self.skip_paths {
            regex::Regex::new(pattern)
                .with_context(|| format!("SEQ_REQUESTLOGS_SKIP_PATHS is not a valid regex: '{pattern}'"))?;
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self, settings: &SettingsResolver) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);

        match settings.raw_seq_url() {
            Some(url) => tracing::info!("  Seq: {}", url),
            None => tracing::info!("  Seq: not configured"),
        }
        match settings.api_key() {
            Some(key) => tracing::info!("  Seq API key: {}", mask_secret(&key)),
            None => tracing::info!("  Seq API key: none"),
        }

        tracing::info!("  Request logging enabled: {}", settings.enabled());
        tracing::info!("  Delivery timeout: {}s", self.timeout_secs);
        tracing::info!("  Max logged body: {} bytes", self.max_body_bytes);
        if let Some(ref pattern) = self.skip_paths {
            tracing::info!("  Skipped paths: {}", pattern);
        }
    }
}

/// Masks a secret for logging, keeping at most the first four characters.
///
/// - `abcdef123456` → `abcd***`
/// - `abc` → `***`
pub fn mask_secret(secret: &str) -> String {
    let secret = secret.trim();
    if secret.chars().count() <= 4 {
        return "***".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}***")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if variables are malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
