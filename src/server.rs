//! HTTP server initialization and runtime setup.
//!
//! Builds the request logger from environment settings and runs the demo
//! host with it.

use crate::application::hooks::skip_paths_matching;
use crate::application::services::{SeqRequestLogger, SettingsResolver};
use crate::config::Config;
use crate::feature::SeqRequestLogsFeature;
use crate::routes::app_router;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Builds the request logger from settings plus service configuration.
///
/// # Errors
///
/// Returns an error if the Seq URL is missing or invalid, or the skip-path
/// pattern does not compile.
pub fn build_logger(config: &Config, settings: &SettingsResolver) -> Result<SeqRequestLogger> {
    let mut feature = SeqRequestLogsFeature::from_settings(settings)
        .timeout(Duration::from_secs(config.timeout_secs))
        .max_body_bytes(config.max_body_bytes);

    if let Some(pattern) = &config.skip_paths {
        let skip = skip_paths_matching(pattern)
            .with_context(|| format!("Invalid skip-path pattern '{pattern}'"))?;
        feature = feature.skip_logging(skip);
    }

    feature
        .build()
        .context("Failed to configure Seq request logging")
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Request logging cannot be configured
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config, settings: &SettingsResolver) -> Result<()> {
    let logger = Arc::new(build_logger(&config, settings)?);
    tracing::info!("Request logger ready, shipping to {}", logger.transport_target());

    let app = app_router(logger);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::keys;
    use crate::infrastructure::settings::MemorySettings;

    fn config() -> Config {
        Config {
            listen_addr: "127.0.0.1:0".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            timeout_secs: 5,
            max_body_bytes: 2048,
            skip_paths: Some("^/health$".to_string()),
        }
    }

    #[test]
    fn test_build_logger_from_settings() {
        let settings = SettingsResolver::new(Arc::new(
            MemorySettings::new().with(keys::SEQ_URL, "http://localhost:5341"),
        ));

        let logger = build_logger(&config(), &settings).unwrap();
        assert_eq!(logger.max_body_bytes(), 2048);
        assert_eq!(logger.transport_target(), "http://localhost:5341/api/events/raw");
    }

    #[test]
    fn test_build_logger_without_seq_url_fails() {
        let settings = SettingsResolver::new(Arc::new(MemorySettings::new()));
        assert!(build_logger(&config(), &settings).is_err());
    }
}
