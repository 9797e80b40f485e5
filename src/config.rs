//! # Emulator Configuration
//!
//! Region, account and auto-delivery settings are passed to actions as an
//! explicit [`SnsConfig`] value. The server obtains that value from a
//! [`ConfigSource`] on every operation, so environment overrides changed while
//! the process runs are picked up by the next request.

use crate::constants::{env, DEFAULT_BIND_ADDRESS, DEFAULT_REGION};
use crate::error::{Result, SnsError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsConfig {
    /// Region segment of every minted ARN
    pub region: String,
    /// Fixed account segment; when unset a fresh one is generated per ARN
    pub account: Option<String>,
    /// Deliver each message to matching subscriptions as part of Publish
    pub auto_deliver: bool,
    /// Listen address of the bundled HTTP server
    pub bind_address: String,
}

impl Default for SnsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            account: None,
            auto_deliver: false,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

impl SnsConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary string-keyed source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(region) = read(env::REGION) {
            config.region = region;
        }

        config.account = read(env::ACCOUNT);

        if let Some(flag) = read(env::AUTO_DELIVER) {
            config.auto_deliver = parse_flag(&flag).unwrap_or_else(|| {
                warn!(
                    variable = env::AUTO_DELIVER,
                    value = %flag,
                    "Unrecognized auto-deliver flag, auto-delivery stays off"
                );
                false
            });
        }

        if let Some(bind_address) = read(env::BIND_ADDRESS) {
            config.bind_address = bind_address;
        }

        Ok(config)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_auto_deliver(mut self, auto_deliver: bool) -> Self {
        self.auto_deliver = auto_deliver;
        self
    }

    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            SnsError::configuration(format!("Invalid bind address {:?}: {e}", self.bind_address))
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Supplies the configuration in force for a single operation
pub trait ConfigSource: Send + Sync {
    fn current(&self) -> Result<SnsConfig>;
}

/// Re-reads the process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigSource;

impl ConfigSource for EnvConfigSource {
    fn current(&self) -> Result<SnsConfig> {
        SnsConfig::from_env()
    }
}

impl ConfigSource for SnsConfig {
    fn current(&self) -> Result<SnsConfig> {
        Ok(self.clone())
    }
}
