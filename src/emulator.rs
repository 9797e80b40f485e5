//! # SNS Emulator Core
//!
//! Owns the store, the delivery dispatcher and the configuration source, and
//! builds each action with the configuration in force for that one call.

use crate::actions::{CreateTopic, Publish, PublishResult, SubscriptionActions, TopicActions};
use crate::arn::{default_account_generator, AccountGenerator, ArnResolver};
use crate::config::{ConfigSource, SnsConfig};
use crate::delivery::{DeliveryDispatcher, DeliveryReport};
use crate::error::Result;
use crate::logging::log_action;
use crate::models::{NewMessage, Subscription, Topic};
use crate::store::MemoryStore;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct SnsEmulator {
    store: MemoryStore,
    config_source: Arc<dyn ConfigSource>,
    account_generator: AccountGenerator,
    dispatcher: Arc<DeliveryDispatcher>,
}

impl std::fmt::Debug for SnsEmulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnsEmulator")
            .field("store", &self.store)
            .field("config_source", &"<Arc<dyn ConfigSource>>")
            .field("account_generator", &"<AccountGenerator>")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl SnsEmulator {
    /// Emulator with an empty store, real HTTP delivery and random accounts
    pub fn new(config_source: Arc<dyn ConfigSource>) -> Self {
        Self {
            store: MemoryStore::new(),
            config_source,
            account_generator: default_account_generator(),
            dispatcher: Arc::new(DeliveryDispatcher::with_reqwest()),
        }
    }

    /// Emulator pinned to a fixed configuration
    pub fn with_config(config: SnsConfig) -> Self {
        Self::new(Arc::new(config))
    }

    pub fn with_dispatcher(mut self, dispatcher: DeliveryDispatcher) -> Self {
        self.dispatcher = Arc::new(dispatcher);
        self
    }

    pub fn with_account_generator(mut self, account_generator: AccountGenerator) -> Self {
        self.account_generator = account_generator;
        self
    }

    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn dispatcher(&self) -> &DeliveryDispatcher {
        &self.dispatcher
    }

    /// Configuration for the operation about to run
    pub fn config(&self) -> Result<SnsConfig> {
        self.config_source.current()
    }

    fn resolver(&self, config: &SnsConfig) -> ArnResolver {
        ArnResolver::new(config, self.account_generator.clone())
    }

    pub fn create_topic(&self, name: &str) -> Result<Topic> {
        let config = self.config()?;
        CreateTopic::new(&self.store, self.resolver(&config)).call(name)
    }

    pub async fn publish(&self, request: NewMessage) -> Result<PublishResult> {
        let config = self.config()?;
        Publish::new(&self.store, &self.dispatcher, &config)
            .call(request)
            .await
    }

    pub fn list_topics(&self) -> Vec<Topic> {
        TopicActions::new(&self.store).list()
    }

    pub fn delete_topic(&self, topic_arn: &str) -> Result<()> {
        TopicActions::new(&self.store).delete(topic_arn)
    }

    pub fn get_topic_attributes(&self, topic_arn: &str) -> Result<BTreeMap<String, String>> {
        TopicActions::new(&self.store).attributes(topic_arn)
    }

    pub fn set_topic_attribute(&self, topic_arn: &str, name: &str, value: &str) -> Result<Topic> {
        TopicActions::new(&self.store).set_attribute(topic_arn, name, value)
    }

    pub fn subscribe(&self, topic_arn: &str, protocol: &str, endpoint: &str) -> Result<Subscription> {
        let config = self.config()?;
        SubscriptionActions::new(&self.store, self.resolver(&config))
            .subscribe(topic_arn, protocol, endpoint)
    }

    pub fn unsubscribe(&self, subscription_arn: &str) -> Result<()> {
        let config = self.config()?;
        SubscriptionActions::new(&self.store, self.resolver(&config)).unsubscribe(subscription_arn)
    }

    pub fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let config = self.config()?;
        Ok(SubscriptionActions::new(&self.store, self.resolver(&config)).list())
    }

    pub fn list_subscriptions_by_topic(&self, topic_arn: &str) -> Result<Vec<Subscription>> {
        let config = self.config()?;
        SubscriptionActions::new(&self.store, self.resolver(&config)).list_by_topic(topic_arn)
    }

    pub fn get_subscription_attributes(
        &self,
        subscription_arn: &str,
    ) -> Result<BTreeMap<String, String>> {
        let config = self.config()?;
        SubscriptionActions::new(&self.store, self.resolver(&config)).attributes(subscription_arn)
    }

    pub fn set_subscription_attribute(
        &self,
        subscription_arn: &str,
        name: &str,
        value: &str,
    ) -> Result<Subscription> {
        let config = self.config()?;
        SubscriptionActions::new(&self.store, self.resolver(&config))
            .set_attribute(subscription_arn, name, value)
    }

    /// Deliver every stored message to every subscription of its topic
    pub async fn drain(&self) -> DeliveryReport {
        let report = self
            .dispatcher
            .deliver_all(self.store.each_deliverable())
            .await;
        let details = format!(
            "attempted={} delivered={} skipped={} failed={}",
            report.attempted,
            report.delivered,
            report.skipped,
            report.failures.len()
        );
        log_action("Drain", None, "completed", Some(&details));
        report
    }

    pub fn reset(&self) {
        self.store.reset();
        log_action("Reset", None, "completed", None);
    }
}
