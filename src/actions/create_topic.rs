use crate::arn::ArnResolver;
use crate::error::{Result, SnsError};
use crate::logging::log_action;
use crate::models::Topic;
use crate::store::MemoryStore;
use crate::validation::validate_topic_name;

/// Idempotent topic creation keyed on the topic name
#[derive(Debug)]
pub struct CreateTopic<'a> {
    store: &'a MemoryStore,
    resolver: ArnResolver,
}

impl<'a> CreateTopic<'a> {
    pub fn new(store: &'a MemoryStore, resolver: ArnResolver) -> Self {
        Self { store, resolver }
    }

    /// Return the topic called `name`, creating it if needed.
    ///
    /// The name is validated before the store is consulted. An existing topic
    /// is returned as stored, even if the current region or account would
    /// produce a different ARN.
    pub fn call(&self, name: &str) -> Result<Topic> {
        validate_topic_name(name)?;

        let (topic, created) = self.store.find_or_create(
            |topic: &Topic| topic.name == name,
            || {
                Ok::<_, SnsError>(Topic::new(
                    self.resolver.topic_arn(name),
                    name,
                ))
            },
        )?;

        log_action(
            "CreateTopic",
            Some(&topic.arn),
            if created { "created" } else { "existing" },
            None,
        );
        Ok(topic)
    }
}
