//! # Outbound Transports
//!
//! The two capabilities delivery needs from the outside world: POSTing a
//! notification to a webhook, and resolving/sending to a named queue. Both are
//! traits so tests can record calls instead of opening sockets.

use super::errors::{DeliveryError, DeliveryResult};
use crate::constants::SQS_API_VERSION;
use crate::xml;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

/// Capability to POST a body with headers to a URL
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Returns the HTTP status of the response
    async fn post(
        &self,
        url: &str,
        body: String,
        headers: Vec<(String, String)>,
    ) -> DeliveryResult<u16>;
}

/// Capability to look up a queue by name and enqueue a message body
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Request URL of `queue_name` as reported by the service at `service_root`
    async fn queue_url(&self, service_root: &str, queue_name: &str) -> DeliveryResult<String>;

    /// Enqueue `body` and return the queue's message id
    async fn send_message(&self, queue_url: &str, body: &str) -> DeliveryResult<String>;
}

/// Split `<queue-service-root>/<queue-name>` at the last slash
pub fn split_queue_endpoint(endpoint: &str) -> DeliveryResult<(&str, &str)> {
    match endpoint.rsplit_once('/') {
        Some((root, name)) if !root.is_empty() && !name.is_empty() => Ok((root, name)),
        _ => Err(DeliveryError::invalid_queue_endpoint(endpoint)),
    }
}

/// Webhook transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpTransport {
    client: Client,
}

impl ReqwestHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn post(
        &self,
        url: &str,
        body: String,
        headers: Vec<(String, String)>,
    ) -> DeliveryResult<u16> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain; charset=UTF-8")
            .body(body);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::transport(url, e.to_string()))?;

        debug!(url = %url, status = %response.status(), "Notification POST completed");
        Ok(response.status().as_u16())
    }
}

/// Queue transport speaking the SQS query protocol over `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestQueueTransport {
    client: Client,
}

impl ReqwestQueueTransport {
    pub fn new() -> Self {
        Self::default()
    }

    async fn call(
        &self,
        url: &str,
        queue_name: &str,
        action: &str,
        params: &[(&str, &str)],
    ) -> DeliveryResult<String> {
        let mut form = vec![("Action", action), ("Version", SQS_API_VERSION)];
        form.extend_from_slice(params);

        let response = self
            .client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| DeliveryError::queue_operation(queue_name, action, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::queue_operation(queue_name, action, e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        let code = xml::first_element_text(&body, "Code").unwrap_or_default();
        if code.contains("NonExistentQueue") || code.contains("QueueDoesNotExist") {
            return Err(DeliveryError::queue_not_found(queue_name));
        }
        Err(DeliveryError::queue_operation(
            queue_name,
            action,
            format!("HTTP {status} {code}"),
        ))
    }
}

#[async_trait]
impl QueueTransport for ReqwestQueueTransport {
    async fn queue_url(&self, service_root: &str, queue_name: &str) -> DeliveryResult<String> {
        let reply = self
            .call(
                service_root,
                queue_name,
                "GetQueueUrl",
                &[("QueueName", queue_name)],
            )
            .await?;

        xml::first_element_text(&reply, "QueueUrl").ok_or_else(|| {
            DeliveryError::queue_operation(queue_name, "GetQueueUrl", "reply has no QueueUrl")
        })
    }

    async fn send_message(&self, queue_url: &str, body: &str) -> DeliveryResult<String> {
        let reply = self
            .call(queue_url, queue_url, "SendMessage", &[("MessageBody", body)])
            .await?;

        xml::first_element_text(&reply, "MessageId").ok_or_else(|| {
            DeliveryError::queue_operation(queue_url, "SendMessage", "reply has no MessageId")
        })
    }
}
