//! Topic listing, deletion and attributes.

use crate::error::{Result, SnsError};
use crate::logging::log_action;
use crate::models::{Subscription, Topic};
use crate::store::MemoryStore;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct TopicActions<'a> {
    store: &'a MemoryStore,
}

impl<'a> TopicActions<'a> {
    pub fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Topic> {
        self.store.all()
    }

    /// Remove a topic. Deleting an unknown topic succeeds, and subscriptions
    /// of the topic are left in place.
    pub fn delete(&self, topic_arn: &str) -> Result<()> {
        let deleted = self.store.delete::<Topic>(topic_arn);
        log_action(
            "DeleteTopic",
            Some(topic_arn),
            if deleted.is_some() { "deleted" } else { "absent" },
            None,
        );
        Ok(())
    }

    /// Stored attributes plus the computed `TopicArn` and subscription counts
    pub fn attributes(&self, topic_arn: &str) -> Result<BTreeMap<String, String>> {
        let topic = self.require(topic_arn)?;
        let confirmed = self
            .store
            .filter(|subscription: &Subscription| subscription.topic_arn == topic.arn)
            .len();

        let mut attributes = topic.attributes.clone();
        attributes.insert("TopicArn".to_string(), topic.arn.clone());
        attributes.insert("SubscriptionsConfirmed".to_string(), confirmed.to_string());
        attributes.insert("SubscriptionsPending".to_string(), "0".to_string());
        attributes.insert("SubscriptionsDeleted".to_string(), "0".to_string());
        Ok(attributes)
    }

    pub fn set_attribute(&self, topic_arn: &str, name: &str, value: &str) -> Result<Topic> {
        if name.is_empty() {
            return Err(SnsError::invalid_parameter("AttributeName is required"));
        }

        let topic = self
            .store
            .update(topic_arn, |topic: &mut Topic| {
                topic.attributes.insert(name.to_string(), value.to_string());
            })
            .ok_or_else(|| SnsError::not_found(format!("Topic does not exist: {topic_arn}")))?;

        log_action("SetTopicAttributes", Some(topic_arn), "updated", Some(name));
        Ok(topic)
    }

    fn require(&self, topic_arn: &str) -> Result<Topic> {
        self.store
            .fetch(topic_arn)
            .ok_or_else(|| SnsError::not_found(format!("Topic does not exist: {topic_arn}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_topic() -> MemoryStore {
        let store = MemoryStore::new();
        store.create(Topic::new("arn:aws:sns:us-east-1:1:my-topic", "my-topic"));
        store
    }

    #[test]
    fn test_attributes_round_trip() {
        let store = store_with_topic();
        let actions = TopicActions::new(&store);
        let arn = "arn:aws:sns:us-east-1:1:my-topic";

        assert!(!actions.attributes(arn).unwrap().contains_key("DisplayName"));

        actions
            .set_attribute(arn, "DisplayName", "the display name")
            .unwrap();
        let attributes = actions.attributes(arn).unwrap();
        assert_eq!(attributes["DisplayName"], "the display name");
        assert_eq!(attributes["TopicArn"], arn);
        assert_eq!(attributes["SubscriptionsConfirmed"], "0");
    }

    #[test]
    fn test_unknown_topic_attributes() {
        let store = MemoryStore::new();
        let actions = TopicActions::new(&store);
        assert_eq!(actions.attributes("arn:nope").unwrap_err().code(), "NotFound");
        assert_eq!(
            actions.set_attribute("arn:nope", "DisplayName", "x").unwrap_err().code(),
            "NotFound"
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = store_with_topic();
        let actions = TopicActions::new(&store);
        actions.delete("arn:aws:sns:us-east-1:1:my-topic").unwrap();
        actions.delete("arn:aws:sns:us-east-1:1:my-topic").unwrap();
        assert!(actions.list().is_empty());
    }
}
