//! Subscribe, unsubscribe and subscription listing.

use crate::arn::{subscription_arn, ArnResolver};
use crate::error::{Result, SnsError};
use crate::logging::log_action;
use crate::models::{Subscription, Topic};
use crate::store::MemoryStore;
use std::collections::BTreeMap;

/// The one subscription attribute callers may change
pub const RAW_MESSAGE_DELIVERY: &str = "RawMessageDelivery";

#[derive(Debug)]
pub struct SubscriptionActions<'a> {
    store: &'a MemoryStore,
    resolver: ArnResolver,
}

impl<'a> SubscriptionActions<'a> {
    pub fn new(store: &'a MemoryStore, resolver: ArnResolver) -> Self {
        Self { store, resolver }
    }

    /// Bind `endpoint` to a topic. Subscribing the same (protocol, endpoint)
    /// twice returns the existing subscription.
    ///
    /// The protocol is stored verbatim and only interpreted at delivery.
    pub fn subscribe(&self, topic_arn: &str, protocol: &str, endpoint: &str) -> Result<Subscription> {
        if protocol.is_empty() {
            return Err(SnsError::invalid_parameter("Protocol is required"));
        }
        if endpoint.is_empty() {
            return Err(SnsError::invalid_parameter("Endpoint is required"));
        }
        let topic: Topic = self
            .store
            .fetch(topic_arn)
            .ok_or_else(|| SnsError::not_found(format!("Topic does not exist: {topic_arn}")))?;

        let (subscription, created) = self.store.find_or_create(
            |existing: &Subscription| {
                existing.topic_arn == topic.arn
                    && existing.protocol == protocol
                    && existing.endpoint == endpoint
            },
            || {
                Ok::<_, SnsError>(
                    Subscription::new(subscription_arn(&topic.arn), &topic.arn, protocol, endpoint)
                        .with_owner(self.resolver.account()),
                )
            },
        )?;

        log_action(
            "Subscribe",
            Some(&subscription.arn),
            if created { "created" } else { "existing" },
            Some(protocol),
        );
        Ok(subscription)
    }

    pub fn unsubscribe(&self, subscription_arn: &str) -> Result<()> {
        self.store
            .delete::<Subscription>(subscription_arn)
            .ok_or_else(|| not_found(subscription_arn))?;
        log_action("Unsubscribe", Some(subscription_arn), "deleted", None);
        Ok(())
    }

    pub fn list(&self) -> Vec<Subscription> {
        self.store.all()
    }

    pub fn list_by_topic(&self, topic_arn: &str) -> Result<Vec<Subscription>> {
        if self.store.fetch::<Topic>(topic_arn).is_none() {
            return Err(SnsError::not_found(format!("Topic does not exist: {topic_arn}")));
        }
        Ok(self
            .store
            .filter(|subscription: &Subscription| subscription.topic_arn == topic_arn))
    }

    pub fn attributes(&self, subscription_arn: &str) -> Result<BTreeMap<String, String>> {
        let subscription: Subscription = self
            .store
            .fetch(subscription_arn)
            .ok_or_else(|| not_found(subscription_arn))?;

        Ok(BTreeMap::from([
            ("SubscriptionArn".to_string(), subscription.arn),
            ("TopicArn".to_string(), subscription.topic_arn),
            ("Protocol".to_string(), subscription.protocol),
            ("Endpoint".to_string(), subscription.endpoint),
            ("Owner".to_string(), subscription.owner),
            (
                RAW_MESSAGE_DELIVERY.to_string(),
                subscription.raw_message_delivery.to_string(),
            ),
            ("PendingConfirmation".to_string(), "false".to_string()),
        ]))
    }

    /// Only `RawMessageDelivery` is settable, with `true` or `false`
    pub fn set_attribute(
        &self,
        subscription_arn: &str,
        name: &str,
        value: &str,
    ) -> Result<Subscription> {
        if name != RAW_MESSAGE_DELIVERY {
            return Err(SnsError::invalid_parameter(format!(
                "AttributeName {name} is not supported"
            )));
        }
        let raw = match value.to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(SnsError::invalid_parameter(format!(
                    "{RAW_MESSAGE_DELIVERY} must be true or false, got {value}"
                )))
            }
        };

        let subscription = self
            .store
            .update(subscription_arn, |subscription: &mut Subscription| {
                subscription.raw_message_delivery = raw;
            })
            .ok_or_else(|| not_found(subscription_arn))?;

        log_action(
            "SetSubscriptionAttributes",
            Some(subscription_arn),
            "updated",
            Some(&format!("{name}={raw}")),
        );
        Ok(subscription)
    }
}

fn not_found(subscription_arn: &str) -> SnsError {
    SnsError::not_found(format!("Subscription does not exist: {subscription_arn}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arn::fixed_account_generator;
    use crate::config::SnsConfig;

    const TOPIC: &str = "arn:aws:sns:us-east-1:1:orders";

    fn setup() -> MemoryStore {
        let store = MemoryStore::new();
        store.create(Topic::new(TOPIC, "orders"));
        store
    }

    fn actions(store: &MemoryStore) -> SubscriptionActions<'_> {
        SubscriptionActions::new(
            store,
            ArnResolver::new(&SnsConfig::default(), fixed_account_generator("1")),
        )
    }

    #[test]
    fn test_subscribe_and_list() {
        let store = setup();
        let actions = actions(&store);

        let subscription = actions
            .subscribe(TOPIC, "sqs", "http://localhost:4568/jobs")
            .unwrap();
        assert!(subscription.arn.starts_with(&format!("{TOPIC}:")));
        assert_eq!(subscription.owner, "1");

        assert_eq!(actions.list(), vec![subscription.clone()]);
        assert_eq!(actions.list_by_topic(TOPIC).unwrap(), vec![subscription]);
    }

    #[test]
    fn test_subscribe_is_idempotent_per_endpoint() {
        let store = setup();
        let actions = actions(&store);

        let first = actions.subscribe(TOPIC, "https", "https://hook").unwrap();
        let again = actions.subscribe(TOPIC, "https", "https://hook").unwrap();
        let other = actions.subscribe(TOPIC, "http", "https://hook").unwrap();

        assert_eq!(first.arn, again.arn);
        assert_ne!(first.arn, other.arn);
        assert_eq!(actions.list().len(), 2);
    }

    #[test]
    fn test_subscribe_validation() {
        let store = setup();
        let actions = actions(&store);

        assert_eq!(
            actions.subscribe(TOPIC, "", "x").unwrap_err().code(),
            "InvalidParameterValue"
        );
        assert_eq!(
            actions.subscribe(TOPIC, "sms", "").unwrap_err().code(),
            "InvalidParameterValue"
        );
        assert_eq!(
            actions.subscribe("arn:missing", "sms", "+1").unwrap_err().code(),
            "NotFound"
        );
    }

    #[test]
    fn test_unsubscribe() {
        let store = setup();
        let actions = actions(&store);
        let subscription = actions.subscribe(TOPIC, "sms", "+15555550100").unwrap();

        actions.unsubscribe(&subscription.arn).unwrap();
        assert!(actions.list().is_empty());
        assert_eq!(actions.unsubscribe(&subscription.arn).unwrap_err().code(), "NotFound");
    }

    #[test]
    fn test_raw_message_delivery_attribute() {
        let store = setup();
        let actions = actions(&store);
        let subscription = actions.subscribe(TOPIC, "https", "https://hook").unwrap();
        assert!(!subscription.raw_message_delivery);

        let attributes = actions.attributes(&subscription.arn).unwrap();
        assert_eq!(attributes.get(RAW_MESSAGE_DELIVERY).map(String::as_str), Some("false"));
        assert_eq!(attributes.get("Endpoint").map(String::as_str), Some("https://hook"));

        let updated = actions
            .set_attribute(&subscription.arn, RAW_MESSAGE_DELIVERY, "True")
            .unwrap();
        assert!(updated.raw_message_delivery);
        assert_eq!(
            actions.attributes(&subscription.arn).unwrap()[RAW_MESSAGE_DELIVERY],
            "true"
        );
        assert_eq!(actions.list(), vec![updated]);
    }

    #[test]
    fn test_set_attribute_rejects_unknown_names_and_values() {
        let store = setup();
        let actions = actions(&store);
        let subscription = actions.subscribe(TOPIC, "https", "https://hook").unwrap();

        assert_eq!(
            actions
                .set_attribute(&subscription.arn, "FilterPolicy", "{}")
                .unwrap_err()
                .code(),
            "InvalidParameterValue"
        );
        assert_eq!(
            actions
                .set_attribute(&subscription.arn, RAW_MESSAGE_DELIVERY, "yes")
                .unwrap_err()
                .code(),
            "InvalidParameterValue"
        );
        assert_eq!(
            actions
                .set_attribute("arn:missing", RAW_MESSAGE_DELIVERY, "true")
                .unwrap_err()
                .code(),
            "NotFound"
        );
        assert_eq!(actions.attributes("arn:missing").unwrap_err().code(), "NotFound");
    }
}
