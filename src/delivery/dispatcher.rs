//! # Delivery Dispatcher
//!
//! Routes one stored message to one subscription's transport adapter.
//!
//! ## Protocol handling
//!
//! - `http`/`https`: POST a [`NotificationEnvelope`] to the endpoint, or the
//!   bare body when the subscription has raw message delivery on
//! - `sqs`: resolve the queue named by the endpoint and enqueue the body
//! - `email`, `email-json`, `sms`, `application`: recognized, logged, skipped
//! - anything else: [`DeliveryError::UnsupportedProtocol`]
//!
//! Delivery is synchronous and unretried. [`DeliveryDispatcher::deliver_all`]
//! isolates failures per pair so one unreachable subscriber cannot block the
//! others.

use super::envelope::NotificationEnvelope;
use super::errors::{DeliveryError, DeliveryResult};
use super::protocol::{DeliveryProtocol, UnimplementedProtocol};
use super::structure::resolve_body;
use super::transport::{
    split_queue_endpoint, HttpTransport, QueueTransport, ReqwestHttpTransport,
    ReqwestQueueTransport,
};
use crate::constants::headers;
use crate::logging::log_delivery;
use crate::models::{Message, Subscription};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a successful delivery attempt did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Posted { status: u16 },
    Enqueued { queue_url: String, queue_message_id: String },
    Skipped { protocol: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub subscription_arn: String,
    pub message_id: String,
    pub error: DeliveryError,
}

/// Summary of a multi-pair delivery pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub attempted: usize,
    pub delivered: usize,
    pub skipped: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct DeliveryDispatcher {
    http: Arc<dyn HttpTransport>,
    queues: Arc<dyn QueueTransport>,
}

impl std::fmt::Debug for DeliveryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryDispatcher")
            .field("http", &"<Arc<dyn HttpTransport>>")
            .field("queues", &"<Arc<dyn QueueTransport>>")
            .finish()
    }
}

impl Default for DeliveryDispatcher {
    fn default() -> Self {
        Self::with_reqwest()
    }
}

impl DeliveryDispatcher {
    pub fn new(http: Arc<dyn HttpTransport>, queues: Arc<dyn QueueTransport>) -> Self {
        Self { http, queues }
    }

    /// Dispatcher that talks to real endpoints over HTTP
    pub fn with_reqwest() -> Self {
        Self::new(
            Arc::new(ReqwestHttpTransport::new()),
            Arc::new(ReqwestQueueTransport::new()),
        )
    }

    /// Deliver `message` to `subscription`.
    ///
    /// The protocol is checked before the structured body is resolved, so an
    /// unsupported protocol is reported as such even for malformed messages.
    pub async fn deliver(
        &self,
        subscription: &Subscription,
        message: &Message,
    ) -> DeliveryResult<DeliveryOutcome> {
        let protocol: DeliveryProtocol = subscription.protocol.parse()?;
        let body = resolve_body(message, protocol.as_str())?;

        match protocol {
            DeliveryProtocol::Http | DeliveryProtocol::Https => {
                self.deliver_http(subscription, message, body).await
            }
            DeliveryProtocol::Sqs => self.deliver_sqs(subscription, &body).await,
            DeliveryProtocol::Unimplemented(protocol) => {
                Ok(Self::skip(subscription, message, protocol, &body))
            }
        }
    }

    /// Deliver every pair in order, collecting failures instead of stopping
    pub async fn deliver_all(&self, pairs: Vec<(Subscription, Message)>) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for (subscription, message) in pairs {
            report.attempted += 1;
            let message_id = message.id.to_string();

            match self.deliver(&subscription, &message).await {
                Ok(DeliveryOutcome::Skipped { .. }) => {
                    report.skipped += 1;
                    log_delivery(&subscription.arn, &subscription.protocol, &message_id, "skipped", None);
                }
                Ok(outcome) => {
                    report.delivered += 1;
                    let details = format!("{outcome:?}");
                    log_delivery(
                        &subscription.arn,
                        &subscription.protocol,
                        &message_id,
                        "delivered",
                        Some(&details),
                    );
                }
                Err(error) => {
                    warn!(
                        subscription_arn = %subscription.arn,
                        protocol = %subscription.protocol,
                        message_id = %message_id,
                        error = %error,
                        "Delivery failed"
                    );
                    report.failures.push(DeliveryFailure {
                        subscription_arn: subscription.arn.clone(),
                        message_id,
                        error,
                    });
                }
            }
        }

        report
    }

    async fn deliver_http(
        &self,
        subscription: &Subscription,
        message: &Message,
        body: String,
    ) -> DeliveryResult<DeliveryOutcome> {
        let envelope = NotificationEnvelope::new(message, body);
        let mut http_headers = envelope.headers(&subscription.arn);
        let payload = if subscription.raw_message_delivery {
            http_headers.push((headers::RAW_DELIVERY.to_string(), "true".to_string()));
            envelope.message
        } else {
            envelope.to_json()?
        };

        debug!(
            endpoint = %subscription.endpoint,
            message_id = %envelope.message_id,
            "POSTing notification"
        );
        let status = self
            .http
            .post(&subscription.endpoint, payload, http_headers)
            .await?;

        if !(200..300).contains(&status) {
            warn!(
                endpoint = %subscription.endpoint,
                status = status,
                "Subscriber endpoint answered with a non-success status"
            );
        }
        Ok(DeliveryOutcome::Posted { status })
    }

    async fn deliver_sqs(
        &self,
        subscription: &Subscription,
        body: &str,
    ) -> DeliveryResult<DeliveryOutcome> {
        let (service_root, queue_name) = split_queue_endpoint(&subscription.endpoint)?;
        let queue_url = self.queues.queue_url(service_root, queue_name).await?;
        let queue_message_id = self.queues.send_message(&queue_url, body).await?;

        Ok(DeliveryOutcome::Enqueued {
            queue_url,
            queue_message_id,
        })
    }

    fn skip(
        subscription: &Subscription,
        message: &Message,
        protocol: UnimplementedProtocol,
        body: &str,
    ) -> DeliveryOutcome {
        warn!(
            subscription_arn = %subscription.arn,
            protocol = protocol.as_str(),
            message_id = %message.id,
            body = ?body,
            "Not sending to subscription, protocol has no fake implementation"
        );
        DeliveryOutcome::Skipped {
            protocol: protocol.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMessage;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct CountingTransport {
        posts: Mutex<Vec<(String, String)>>,
        sends: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl HttpTransport for CountingTransport {
        async fn post(
            &self,
            url: &str,
            body: String,
            _headers: Vec<(String, String)>,
        ) -> DeliveryResult<u16> {
            if url.contains("down") {
                return Err(DeliveryError::transport(url, "connection refused"));
            }
            self.posts.lock().unwrap().push((url.to_string(), body));
            Ok(200)
        }
    }

    #[async_trait]
    impl QueueTransport for CountingTransport {
        async fn queue_url(&self, service_root: &str, queue_name: &str) -> DeliveryResult<String> {
            Ok(format!("{service_root}/000000000000/{queue_name}"))
        }

        async fn send_message(&self, queue_url: &str, body: &str) -> DeliveryResult<String> {
            self.sends
                .lock()
                .unwrap()
                .push((queue_url.to_string(), body.to_string()));
            Ok("queue-message-1".to_string())
        }
    }

    fn dispatcher() -> (DeliveryDispatcher, Arc<CountingTransport>) {
        let transport = Arc::new(CountingTransport::default());
        (
            DeliveryDispatcher::new(transport.clone(), transport.clone()),
            transport,
        )
    }

    fn message(body: &str) -> Message {
        NewMessage::new(body)
            .to_topic("arn:aws:sns:us-east-1:1:t")
            .into_message(Uuid::new_v4(), Utc::now())
    }

    fn subscription(protocol: &str, endpoint: &str) -> Subscription {
        Subscription::new("arn:aws:sns:us-east-1:1:t:s", "arn:aws:sns:us-east-1:1:t", protocol, endpoint)
    }

    #[tokio::test]
    async fn test_unknown_protocol_is_rejected() {
        let (dispatcher, transport) = dispatcher();
        let err = dispatcher
            .deliver(&subscription("carrier-pigeon", "coop"), &message("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "InvalidParameterValue");
        assert!(transport.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unimplemented_protocol_is_skipped() {
        let (dispatcher, transport) = dispatcher();
        for protocol in ["email", "email-json", "sms", "application"] {
            let outcome = dispatcher
                .deliver(&subscription(protocol, "somewhere"), &message("hi"))
                .await
                .unwrap();
            assert_eq!(outcome, DeliveryOutcome::Skipped { protocol: protocol_name(protocol) });
        }
        assert!(transport.posts.lock().unwrap().is_empty());
        assert!(transport.sends.lock().unwrap().is_empty());
    }

    fn protocol_name(protocol: &str) -> &'static str {
        protocol.parse::<DeliveryProtocol>().unwrap().as_str()
    }

    #[tokio::test]
    async fn test_http_posts_envelope_unless_raw_delivery() {
        let (dispatcher, transport) = dispatcher();
        let msg = message("plain body");
        let wrapped = subscription("https", "https://up.example/wrapped");
        let mut raw = subscription("http", "http://up.example/raw");
        raw.raw_message_delivery = true;

        dispatcher.deliver(&wrapped, &msg).await.unwrap();
        dispatcher.deliver(&raw, &msg).await.unwrap();

        let posts = transport.posts.lock().unwrap();
        let envelope: NotificationEnvelope = serde_json::from_str(&posts[0].1).unwrap();
        assert_eq!(envelope.message, "plain body");
        assert_eq!(envelope.message_id, msg.id.to_string());
        assert_eq!(
            posts[1],
            ("http://up.example/raw".to_string(), "plain body".to_string())
        );
    }

    #[tokio::test]
    async fn test_sqs_resolves_queue_then_sends_body() {
        let (dispatcher, transport) = dispatcher();
        let outcome = dispatcher
            .deliver(&subscription("sqs", "http://localhost:4568/jobs"), &message("work"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DeliveryOutcome::Enqueued {
                queue_url: "http://localhost:4568/000000000000/jobs".to_string(),
                queue_message_id: "queue-message-1".to_string(),
            }
        );
        assert_eq!(
            transport.sends.lock().unwrap().as_slice(),
            &[(
                "http://localhost:4568/000000000000/jobs".to_string(),
                "work".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_deliver_all_isolates_failures() {
        let (dispatcher, transport) = dispatcher();
        let msg = message("hi");
        let pairs = vec![
            (subscription("http", "http://down.example/hook"), msg.clone()),
            (subscription("https", "https://up.example/hook"), msg.clone()),
            (subscription("sms", "+15555550100"), msg.clone()),
            (subscription("gopher", "gopher://x"), msg),
        ];

        let report = dispatcher.deliver_all(pairs).await;
        assert_eq!(report.attempted, 4);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures.len(), 2);
        assert!(!report.is_clean());
        assert_eq!(transport.posts.lock().unwrap().len(), 1);
    }
}
