//! # Fake SNS Server
//!
//! Serves the SNS query-protocol API on a local address.
//!
//! Without overrides the configuration is re-read from the environment on
//! every request. Passing `--region`, `--account` or `--auto-deliver` pins
//! the configuration for the lifetime of the process.

use anyhow::Context;
use clap::Parser;
use fake_sns::config::{ConfigSource, EnvConfigSource, SnsConfig};
use fake_sns::logging::init_structured_logging;
use fake_sns::web::{self, AppState};
use fake_sns::SnsEmulator;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fake-sns")]
#[command(about = "Local emulator of the SNS publish/subscribe API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Address to listen on (default: FAKE_SNS_BIND_ADDRESS or 127.0.0.1:9292)
    #[arg(short, long)]
    bind: Option<String>,

    /// Region embedded in generated ARNs
    #[arg(short, long)]
    region: Option<String>,

    /// Account id embedded in generated ARNs
    #[arg(short, long)]
    account: Option<String>,

    /// Deliver each message to its topic's subscriptions as it is published
    #[arg(long)]
    auto_deliver: Option<bool>,
}

impl Cli {
    fn has_overrides(&self) -> bool {
        self.region.is_some() || self.account.is_some() || self.auto_deliver.is_some()
    }

    fn apply(&self, mut config: SnsConfig) -> SnsConfig {
        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        if let Some(account) = &self.account {
            config = config.with_account(account);
        }
        if let Some(auto_deliver) = self.auto_deliver {
            config = config.with_auto_deliver(auto_deliver);
        }
        if let Some(bind) = &self.bind {
            config = config.with_bind_address(bind);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_structured_logging();
    let cli = Cli::parse();

    let config = cli.apply(SnsConfig::from_env().context("reading configuration")?);
    let addr = config.socket_addr().context("parsing bind address")?;

    let source: Arc<dyn ConfigSource> = if cli.has_overrides() {
        info!(region = %config.region, auto_deliver = config.auto_deliver, "Using pinned configuration");
        Arc::new(config)
    } else {
        Arc::new(EnvConfigSource)
    };

    let state = AppState::new(SnsEmulator::new(source));
    web::serve(state, addr)
        .await
        .with_context(|| format!("serving on {addr}"))?;

    info!("Fake SNS stopped");
    Ok(())
}
