//! # Structured Logging Module
//!
//! Environment-aware structured logging for the emulator. Console output is
//! human readable by default and switches to JSON lines when
//! `FAKE_SNS_LOG_FORMAT=json`, which is what CI log collectors want.

use crate::constants::env;
use chrono::Utc;
use std::process;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var(env::LOG_FORMAT)
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let console = if json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // A host test harness may already own the global subscriber
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = process::id(),
            environment = %environment,
            json = json,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var(env::ENVIRONMENT)
        .or_else(|_| std::env::var("RACK_ENV"))
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for an API action
pub fn log_action(action: &str, resource: Option<&str>, status: &str, details: Option<&str>) {
    tracing::info!(
        action = %action,
        resource = resource,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "SNS_ACTION"
    );
}

/// Log structured data for a single delivery attempt
pub fn log_delivery(
    subscription_arn: &str,
    protocol: &str,
    message_id: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        subscription_arn = %subscription_arn,
        protocol = %protocol,
        message_id = %message_id,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "SNS_DELIVERY"
    );
}
