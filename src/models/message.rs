use crate::constants::MESSAGE_STRUCTURE_JSON;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published message. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub subject: Option<String>,
    pub message: String,
    pub topic_arn: Option<String>,
    pub structure: Option<String>,
    pub target_arn: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// Publish input after validation, before an id is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub message: String,
    pub message_structure: Option<String>,
    pub subject: Option<String>,
    pub target_arn: Option<String>,
    pub topic_arn: Option<String>,
}

impl NewMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn to_topic(mut self, topic_arn: impl Into<String>) -> Self {
        self.topic_arn = Some(topic_arn.into());
        self
    }

    pub fn to_target(mut self, target_arn: impl Into<String>) -> Self {
        self.target_arn = Some(target_arn.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.message_structure = Some(structure.into());
        self
    }

    /// Stamp the input with an id and receive time
    pub fn into_message(self, id: Uuid, received_at: DateTime<Utc>) -> Message {
        Message {
            id,
            subject: self.subject,
            message: self.message,
            topic_arn: self.topic_arn,
            structure: self.message_structure,
            target_arn: self.target_arn,
            received_at,
        }
    }
}

impl Message {
    /// Whether the body is a protocol-keyed JSON map
    pub fn is_structured(&self) -> bool {
        self.structure.as_deref() == Some(MESSAGE_STRUCTURE_JSON)
    }
}
