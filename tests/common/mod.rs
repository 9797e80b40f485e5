//! Shared helpers for the integration tests.
//!
//! `MockTransport` stands in for both outbound transports and records every
//! call so tests can assert on what would have reached the network.

#![allow(dead_code)]

use async_trait::async_trait;
use fake_sns::delivery::{
    DeliveryDispatcher, DeliveryError, DeliveryResult, HttpTransport, NotificationEnvelope,
    QueueTransport,
};
use fake_sns::{SnsConfig, SnsEmulator};
use std::sync::{Arc, Mutex};

pub const ACCOUNT: &str = "123456789012";

/// A POST the dispatcher made to a webhook
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedPost {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn envelope(&self) -> NotificationEnvelope {
        serde_json::from_str(&self.body).expect("webhook body is a notification envelope")
    }
}

#[derive(Debug, Default)]
pub struct MockTransportState {
    pub posts: Vec<RecordedPost>,
    pub queue_lookups: Vec<(String, String)>,
    pub sends: Vec<(String, String)>,
    /// Queue names that answer as nonexistent
    pub missing_queues: Vec<String>,
    /// URLs whose POST fails at the transport level
    pub unreachable_urls: Vec<String>,
}

/// Recording stand-in for the webhook and queue transports
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockTransportState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_queue(self, queue_name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .missing_queues
            .push(queue_name.to_string());
        self
    }

    pub fn with_unreachable_url(self, url: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .unreachable_urls
            .push(url.to_string());
        self
    }

    pub fn dispatcher(&self) -> DeliveryDispatcher {
        DeliveryDispatcher::new(Arc::new(self.clone()), Arc::new(self.clone()))
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.state.lock().unwrap().posts.clone()
    }

    pub fn sends(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().sends.clone()
    }

    pub fn queue_lookups(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().queue_lookups.clone()
    }

    /// Number of transport calls of any kind
    pub fn call_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.posts.len() + state.sends.len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(
        &self,
        url: &str,
        body: String,
        headers: Vec<(String, String)>,
    ) -> DeliveryResult<u16> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable_urls.iter().any(|u| u == url) {
            return Err(DeliveryError::transport(url, "connection refused"));
        }
        state.posts.push(RecordedPost {
            url: url.to_string(),
            body,
            headers,
        });
        Ok(200)
    }
}

#[async_trait]
impl QueueTransport for MockTransport {
    async fn queue_url(&self, service_root: &str, queue_name: &str) -> DeliveryResult<String> {
        let mut state = self.state.lock().unwrap();
        state
            .queue_lookups
            .push((service_root.to_string(), queue_name.to_string()));
        if state.missing_queues.iter().any(|q| q == queue_name) {
            return Err(DeliveryError::queue_not_found(queue_name));
        }
        Ok(format!("{service_root}/{ACCOUNT}/{queue_name}"))
    }

    async fn send_message(&self, queue_url: &str, body: &str) -> DeliveryResult<String> {
        let mut state = self.state.lock().unwrap();
        state.sends.push((queue_url.to_string(), body.to_string()));
        Ok(format!("queue-message-{}", state.sends.len()))
    }
}

pub fn test_config() -> SnsConfig {
    SnsConfig::default().with_account(ACCOUNT)
}

/// Emulator pinned to `config` whose deliveries are recorded, not sent
pub fn emulator_with(config: SnsConfig) -> (SnsEmulator, MockTransport) {
    let transport = MockTransport::new();
    let emulator = SnsEmulator::with_config(config).with_dispatcher(transport.dispatcher());
    (emulator, transport)
}

pub fn emulator() -> (SnsEmulator, MockTransport) {
    emulator_with(test_config())
}
