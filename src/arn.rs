//! # ARN Resolution
//!
//! Builds resource identifiers of the form
//! `arn:aws:sns:<region>:<account>:<resource>`.
//!
//! When no account override is configured, the account segment comes from an
//! [`AccountGenerator`] that is called for every ARN. The default generator
//! returns a new random token each time, so callers that need stable ARNs
//! across calls must pin the account.

use crate::config::SnsConfig;
use crate::constants::{ARN_PARTITION, ARN_SERVICE};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Produces the account segment when no override is configured
pub type AccountGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// 32 random hex characters
pub fn random_account_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn default_account_generator() -> AccountGenerator {
    Arc::new(random_account_id)
}

/// Always returns `account`
pub fn fixed_account_generator(account: impl Into<String>) -> AccountGenerator {
    let account = account.into();
    Arc::new(move || account.clone())
}

/// Mints ARNs for one operation's configuration
#[derive(Clone)]
pub struct ArnResolver {
    region: String,
    account: Option<String>,
    generator: AccountGenerator,
}

impl fmt::Debug for ArnResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArnResolver")
            .field("region", &self.region)
            .field("account", &self.account)
            .field("generator", &"<AccountGenerator>")
            .finish()
    }
}

impl ArnResolver {
    pub fn new(config: &SnsConfig, generator: AccountGenerator) -> Self {
        Self {
            region: config.region.clone(),
            account: config.account.clone(),
            generator,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The configured account, or a freshly generated one
    pub fn account(&self) -> String {
        match &self.account {
            Some(account) => account.clone(),
            None => (self.generator)(),
        }
    }

    /// ARN of the topic called `name`
    pub fn topic_arn(&self, name: &str) -> String {
        format!(
            "arn:{ARN_PARTITION}:{ARN_SERVICE}:{}:{}:{name}",
            self.region,
            self.account()
        )
    }
}

/// Subscription ARNs extend their topic's ARN with a random suffix
pub fn subscription_arn(topic_arn: &str) -> String {
    format!("{topic_arn}:{}", Uuid::new_v4())
}
