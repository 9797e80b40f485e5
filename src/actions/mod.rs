//! # API Actions
//!
//! One type per group of SNS actions. Each is built for a single operation
//! from the store plus that operation's configuration, then called once.

pub mod create_topic;
pub mod publish;
pub mod subscriptions;
pub mod topics;

pub use create_topic::CreateTopic;
pub use publish::{Publish, PublishResult};
pub use subscriptions::SubscriptionActions;
pub use topics::TopicActions;
