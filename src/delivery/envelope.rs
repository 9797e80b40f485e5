//! JSON notification envelope POSTed to `http`/`https` subscribers.

use super::errors::{DeliveryError, DeliveryResult};
use crate::constants::{headers, notification};
use crate::models::Message;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "MessageId")]
    pub message_id: String,
    #[serde(rename = "TopicArn")]
    pub topic_arn: Option<String>,
    #[serde(rename = "Subject")]
    pub subject: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "SignatureVersion")]
    pub signature_version: String,
    #[serde(rename = "Signature")]
    pub signature: String,
    #[serde(rename = "SigningCertURL")]
    pub signing_cert_url: String,
    #[serde(rename = "UnsubscribeURL")]
    pub unsubscribe_url: String,
}

impl NotificationEnvelope {
    /// Envelope for `message` carrying the already resolved `body`
    pub fn new(message: &Message, body: String) -> Self {
        Self {
            kind: notification::TYPE.to_string(),
            message_id: message.id.to_string(),
            topic_arn: message.topic_arn.clone(),
            subject: message.subject.clone(),
            message: body,
            timestamp: message
                .received_at
                .format(notification::TIMESTAMP_FORMAT)
                .to_string(),
            signature_version: notification::SIGNATURE_VERSION.to_string(),
            signature: notification::SIGNATURE.to_string(),
            signing_cert_url: notification::SIGNING_CERT_URL.to_string(),
            unsubscribe_url: notification::UNSUBSCRIBE_URL.to_string(),
        }
    }

    pub fn to_json(&self) -> DeliveryResult<String> {
        serde_json::to_string(self).map_err(|e| {
            DeliveryError::malformed_structure(&self.message_id, format!("envelope encoding: {e}"))
        })
    }

    /// Headers identifying the notification to the receiving endpoint
    pub fn headers(&self, subscription_arn: &str) -> Vec<(String, String)> {
        vec![
            (headers::MESSAGE_TYPE.to_string(), self.kind.clone()),
            (headers::MESSAGE_ID.to_string(), self.message_id.clone()),
            (
                headers::TOPIC_ARN.to_string(),
                self.topic_arn.clone().unwrap_or_default(),
            ),
            (
                headers::SUBSCRIPTION_ARN.to_string(),
                subscription_arn.to_string(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMessage;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn message() -> Message {
        NewMessage::new("raw")
            .to_topic("arn:aws:sns:us-east-1:1:orders")
            .with_subject("hello")
            .into_message(
                Uuid::new_v4(),
                Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
            )
    }

    #[test]
    fn test_envelope_fields() {
        let message = message();
        let envelope = NotificationEnvelope::new(&message, "resolved".to_string());
        let json: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();

        assert_eq!(json["Type"], "Notification");
        assert_eq!(json["MessageId"], message.id.to_string());
        assert_eq!(json["TopicArn"], "arn:aws:sns:us-east-1:1:orders");
        assert_eq!(json["Subject"], "hello");
        assert_eq!(json["Message"], "resolved");
        assert_eq!(json["Timestamp"], "2024-03-09T14:05:07Z");
        assert_eq!(json["SignatureVersion"], "1");
        assert_eq!(json["Signature"], "Fake");
        assert!(json["SigningCertURL"].as_str().unwrap().starts_with("https://sns.us-east-1"));
        assert_eq!(json["UnsubscribeURL"], "");
    }

    #[test]
    fn test_absent_subject_serializes_as_null() {
        let mut message = message();
        message.subject = None;
        let envelope = NotificationEnvelope::new(&message, "b".to_string());
        let json: serde_json::Value = serde_json::from_str(&envelope.to_json().unwrap()).unwrap();
        assert!(json["Subject"].is_null());
    }

    #[test]
    fn test_headers() {
        let message = message();
        let envelope = NotificationEnvelope::new(&message, "b".to_string());
        let headers = envelope.headers("arn:aws:sns:us-east-1:1:orders:sub");

        let lookup = |name: &str| {
            headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(lookup("x-amz-sns-message-type"), Some("Notification"));
        assert_eq!(lookup("x-amz-sns-message-id"), Some(message.id.to_string().as_str()));
        assert_eq!(lookup("x-amz-sns-topic-arn"), Some("arn:aws:sns:us-east-1:1:orders"));
        assert_eq!(
            lookup("x-amz-sns-subscription-arn"),
            Some("arn:aws:sns:us-east-1:1:orders:sub")
        );
    }
}
