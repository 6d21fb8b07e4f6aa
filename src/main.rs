use seq_request_logs::application::services::SettingsResolver;
use seq_request_logs::config::{self, Config};
use seq_request_logs::infrastructure::settings::EnvSettings;
use seq_request_logs::server;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;
    init_tracing(&config);

    let settings = SettingsResolver::new(Arc::new(EnvSettings::new()));
    config.print_summary(&settings);

    server::run(config, &settings).await
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
