//! CLI administration tool for seq-request-logs.
//!
//! Inspects and changes the request-logging toggles of a running service and
//! checks the Seq settings without starting a server.
//!
//! # Usage
//!
//! ```bash
//! # Show the toggles of a running service
//! cargo run --bin admin -- config show
//!
//! # Turn session tracking on
//! cargo run --bin admin -- config set --session-tracking true
//!
//! # Send one test event to Seq
//! cargo run --bin admin -- ping
//!
//! # Validate settings from the environment
//! cargo run --bin admin -- check
//! ```
//!
//! # Environment Variables
//!
//! - `SEQ_REQUESTLOGS_SEQ_URL` (required for `ping` and `check`): Seq server URL
//! - `SEQ_REQUESTLOGS_SEQ_APIKEY` (optional): Seq API key
//!
//! # Features
//!
//! - **Runtime Toggles**: Read and update a running service's configuration
//! - **Connectivity**: Synchronous test delivery to Seq
//! - **Interactive Prompts**: Confirmation before changing a live service
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use seq_request_logs::api::dto::config::SeqRequestLogConfig;
use seq_request_logs::api::routes::CONFIG_PATH;
use seq_request_logs::application::services::SettingsResolver;
use seq_request_logs::config::{Config, mask_secret};
use seq_request_logs::domain::entities::{LogEntry, Level};
use seq_request_logs::infrastructure::settings::EnvSettings;
use seq_request_logs::infrastructure::transport::{LogTransport, SeqTransport};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing seq-request-logs.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Runtime configuration of a running service
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Send a test event to Seq
    Ping,

    /// Validate settings from the environment
    Check,
}

/// Runtime configuration subcommands.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show current toggles
    Show {
        /// Base URL of the running service
        #[arg(short, long, default_value = "http://localhost:3000")]
        service: String,
    },

    /// Change toggles; omitted flags are left untouched
    Set {
        /// Base URL of the running service
        #[arg(short, long, default_value = "http://localhost:3000")]
        service: String,

        #[arg(long)]
        enabled: Option<bool>,

        #[arg(long)]
        error_tracking: Option<bool>,

        #[arg(long)]
        request_body_tracking: Option<bool>,

        #[arg(long)]
        session_tracking: Option<bool>,

        #[arg(long)]
        response_tracking: Option<bool>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => handle_config_action(action).await?,
        Commands::Ping => handle_ping().await?,
        Commands::Check => handle_check()?,
    }

    Ok(())
}

/// Dispatches runtime configuration commands.
async fn handle_config_action(action: ConfigAction) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("Failed to create HTTP client")?;

    match action {
        ConfigAction::Show { service } => {
            println!("{}", "📋 Request Logging Configuration".bright_blue().bold());
            println!();

            let toggles = fetch_config(&client, &service, None).await?;
            print_toggles(&toggles);
        }
        ConfigAction::Set {
            service,
            enabled,
            error_tracking,
            request_body_tracking,
            session_tracking,
            response_tracking,
            yes,
        } => {
            let update = SeqRequestLogConfig {
                enabled,
                enable_session_tracking: session_tracking,
                enable_request_body_tracking: request_body_tracking,
                enable_response_tracking: response_tracking,
                enable_error_tracking: error_tracking,
            };
            set_config(&client, &service, update, yes).await?;
        }
    }

    Ok(())
}

/// Applies a toggle update to a running service with confirmation.
///
/// # Flow
///
/// 1. Show the requested changes
/// 2. Confirm (unless `--yes` flag)
/// 3. POST the update
/// 4. Display the resulting toggles
async fn set_config(
    client: &reqwest::Client,
    service: &str,
    update: SeqRequestLogConfig,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔧 Update Request Logging".bright_blue().bold());
    println!();

    if update == SeqRequestLogConfig::default() {
        println!("{}", "⚠️  No changes requested".yellow());
        return Ok(());
    }

    println!("{}", "Requested changes:".bright_white().bold());
    for (name, value) in toggle_rows(&update) {
        if let Some(value) = value {
            println!("  {:<24} {}", name.cyan(), format_bool(value));
        }
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Apply to {}?", service))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let toggles = fetch_config(client, service, Some(update)).await?;

    println!();
    println!("{}", "✅ Configuration updated!".green().bold());
    println!();
    print_toggles(&toggles);

    Ok(())
}

/// Reads (`update == None`) or changes the toggles of a running service.
async fn fetch_config(
    client: &reqwest::Client,
    service: &str,
    update: Option<SeqRequestLogConfig>,
) -> Result<SeqRequestLogConfig> {
    let url = format!("{}{}", service.trim_end_matches('/'), CONFIG_PATH);

    let request = match update {
        Some(update) => client.post(&url).json(&update),
        None => client.get(&url),
    };

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Service responded {}: {}", status, body);
    }

    response
        .json::<SeqRequestLogConfig>()
        .await
        .context("Unexpected response body")
}

/// Sends one synchronous test event to Seq using the environment settings.
async fn handle_ping() -> Result<()> {
    println!("{}", "📡 Seq Connectivity".bright_blue().bold());
    println!();

    let settings = SettingsResolver::new(Arc::new(EnvSettings::new()));
    let seq_url = settings.seq_url().context("Seq URL is not configured")?;
    let api_key = settings.api_key();

    let transport = SeqTransport::new(&seq_url, api_key.as_deref(), Duration::from_secs(10))
        .context("Failed to create Seq transport")?;

    println!("  Target: {}", transport.target().cyan());

    let mut entry = LogEntry::new();
    entry.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true));
    entry.level = Level::Debug;
    entry.message_template = "Connectivity check from {Source}".to_string();
    entry.get_or_add("Source", "seq-request-logs admin");
    entry.get_or_add("IsRequestLog", false);

    match transport.send(&entry).await {
        Ok(()) => {
            println!();
            println!("{}", "✅ Seq accepted the test event".green().bold());
        }
        Err(e) => {
            println!();
            println!("{} {}", "❌ Delivery failed:".red().bold(), e);
            anyhow::bail!("Seq ping failed");
        }
    }

    Ok(())
}

/// Validates the service and feature settings without starting a server.
fn handle_check() -> Result<()> {
    println!("{}", "🔍 Settings Check".bright_blue().bold());
    println!();

    let config = Config::from_env().context("Failed to read service configuration")?;
    match config.validate() {
        Ok(()) => println!("  {} Service configuration", "✓".green()),
        Err(e) => {
            println!("  {} Service configuration: {}", "✗".red(), e);
            anyhow::bail!("Invalid service configuration");
        }
    }

    let settings = SettingsResolver::new(Arc::new(EnvSettings::new()));
    let feature = match settings.feature_config() {
        Ok(feature) => {
            println!("  {} Seq URL: {}", "✓".green(), feature.seq_url.to_string().cyan());
            feature
        }
        Err(e) => {
            println!("  {} Seq URL: {}", "✗".red(), e);
            anyhow::bail!("Invalid Seq settings");
        }
    };

    match feature.effective_api_key() {
        Some(key) => println!("  {} API key: {}", "✓".green(), mask_secret(key).bright_black()),
        None => println!("  {} API key: {}", "•".bright_black(), "none".bright_black()),
    }
    if !feature.required_roles.is_empty() {
        println!(
            "  {} Required roles: {}",
            "•".bright_black(),
            feature.required_roles.join(", ").cyan()
        );
    }
    println!();

    print_toggles(&feature_toggles(&feature));

    Ok(())
}

fn feature_toggles(
    feature: &seq_request_logs::domain::entities::FeatureConfig,
) -> SeqRequestLogConfig {
    seq_request_logs::domain::entities::FeatureToggles::from(feature).into()
}

/// Prints toggles as an aligned table.
///
/// # Output Format
///
/// ```text
///   Toggle                   Value
///   ─────────────────────────────────
///   enabled                  ON
///   enableSessionTracking    OFF
/// ```
fn print_toggles(toggles: &SeqRequestLogConfig) {
    println!(
        "  {:<24} {}",
        "Toggle".bright_white().bold(),
        "Value".bright_white().bold()
    );
    println!("  {}", "─".repeat(33).bright_black());

    for (name, value) in toggle_rows(toggles) {
        let value = match value {
            Some(v) => format_bool(v),
            None => "?".bright_black(),
        };
        println!("  {:<24} {}", name.cyan(), value);
    }
    println!();
}

fn toggle_rows(toggles: &SeqRequestLogConfig) -> [(&'static str, Option<bool>); 5] {
    [
        ("enabled", toggles.enabled),
        ("enableErrorTracking", toggles.enable_error_tracking),
        ("enableRequestBodyTracking", toggles.enable_request_body_tracking),
        ("enableSessionTracking", toggles.enable_session_tracking),
        ("enableResponseTracking", toggles.enable_response_tracking),
    ]
}

fn format_bool(value: bool) -> ColoredString {
    if value { "ON".green() } else { "OFF".red() }
}
