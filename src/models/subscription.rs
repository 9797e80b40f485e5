use serde::{Deserialize, Serialize};

/// Binding of a topic to a delivery protocol and endpoint address
///
/// `protocol` is stored exactly as the caller supplied it. It is only
/// interpreted when a message is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub arn: String,
    pub topic_arn: String,
    pub protocol: String,
    pub endpoint: String,
    pub owner: String,
    /// Post the resolved body as-is instead of a notification envelope
    #[serde(default)]
    pub raw_message_delivery: bool,
}

impl Subscription {
    pub fn new(
        arn: impl Into<String>,
        topic_arn: impl Into<String>,
        protocol: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            arn: arn.into(),
            topic_arn: topic_arn.into(),
            protocol: protocol.into(),
            endpoint: endpoint.into(),
            owner: String::new(),
            raw_message_delivery: false,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }
}
