//! # Publish
//!
//! Validates and stores a message, then optionally delivers it to every
//! subscription of its topic before returning.
//!
//! Validation order, all before any write:
//! 1. body size
//! 2. topic lookup (an unknown topic is tolerated when a target ARN is given)
//! 3. disabled push endpoint check on the target ARN

use crate::config::SnsConfig;
use crate::delivery::{DeliveryDispatcher, DeliveryReport};
use crate::error::{Result, SnsError};
use crate::logging::log_action;
use crate::models::{Message, NewMessage, Topic};
use crate::store::MemoryStore;
use crate::validation::{validate_endpoint_enabled, validate_message_size};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// A stored message and, when auto-delivery ran, what it did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub message: Message,
    pub delivery: Option<DeliveryReport>,
}

#[derive(Debug)]
pub struct Publish<'a> {
    store: &'a MemoryStore,
    dispatcher: &'a DeliveryDispatcher,
    auto_deliver: bool,
}

impl<'a> Publish<'a> {
    pub fn new(store: &'a MemoryStore, dispatcher: &'a DeliveryDispatcher, config: &SnsConfig) -> Self {
        Self {
            store,
            dispatcher,
            auto_deliver: config.auto_deliver,
        }
    }

    pub async fn call(&self, request: NewMessage) -> Result<PublishResult> {
        validate_message_size(&request.message)?;

        let topic = self.resolve_topic(&request)?;
        validate_endpoint_enabled(request.target_arn.as_deref())?;

        let message = self
            .store
            .create(request.into_message(Uuid::new_v4(), Utc::now()));

        log_action(
            "Publish",
            message.topic_arn.as_deref().or(message.target_arn.as_deref()),
            "stored",
            Some(&message.id.to_string()),
        );

        let delivery = if self.auto_deliver {
            Some(self.deliver(&message, topic.as_ref()).await)
        } else {
            None
        };

        Ok(PublishResult { message, delivery })
    }

    fn resolve_topic(&self, request: &NewMessage) -> Result<Option<Topic>> {
        let topic_arn = request.topic_arn.as_deref().unwrap_or_default();
        self.store.fetch_or_else(topic_arn, || {
            if request.target_arn.is_some() {
                Ok(None)
            } else {
                Err(SnsError::invalid_parameter(format!("Unknown topic: {topic_arn}")))
            }
        })
    }

    /// Deliver the new message to each subscription of its topic.
    ///
    /// Failures are logged and reported, never returned as errors.
    async fn deliver(&self, message: &Message, topic: Option<&Topic>) -> DeliveryReport {
        if topic.is_none() {
            info!(message_id = %message.id, "No resolvable topic, skipping auto-delivery");
            return DeliveryReport::default();
        }

        let pairs = self.store.deliverable_for(message.id);
        let report = self.dispatcher.deliver_all(pairs).await;
        if !report.is_clean() {
            warn!(
                message_id = %message.id,
                failures = report.failures.len(),
                "Auto-delivery finished with failures"
            );
        }
        report
    }
}
