//! # Query-Protocol Responses
//!
//! XML documents returned to SNS client SDKs, and the conversion of
//! [`SnsError`] into an `ErrorResponse` with the matching HTTP status.

use crate::constants::SNS_XML_NAMESPACE;
use crate::error::SnsError;
use crate::models::{Subscription, Topic};
use crate::xml::element;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::collections::BTreeMap;
use uuid::Uuid;

const XML_CONTENT_TYPE: &str = "text/xml";

/// Successful `<{Action}Response>` document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlResponse {
    action: &'static str,
    result: Option<String>,
    request_id: Uuid,
}

impl XmlResponse {
    /// Response carrying only `ResponseMetadata`
    pub fn empty(action: &'static str) -> Self {
        Self {
            action,
            result: None,
            request_id: Uuid::new_v4(),
        }
    }

    /// Response whose `<{Action}Result>` wraps `inner`, which must already be XML
    pub fn with_result(action: &'static str, inner: impl Into<String>) -> Self {
        Self {
            result: Some(inner.into()),
            ..Self::empty(action)
        }
    }

    pub fn action(&self) -> &str {
        self.action
    }

    pub fn render(&self) -> String {
        let action = self.action;
        let result = self
            .result
            .as_ref()
            .map(|inner| format!("<{action}Result>{inner}</{action}Result>"))
            .unwrap_or_default();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><{action}Response xmlns="{SNS_XML_NAMESPACE}">{result}<ResponseMetadata>{}</ResponseMetadata></{action}Response>"#,
            element("RequestId", &self.request_id.to_string())
        )
    }
}

impl IntoResponse for XmlResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(CONTENT_TYPE, XML_CONTENT_TYPE)],
            self.render(),
        )
            .into_response()
    }
}

pub fn topic_arn_result(topic: &Topic) -> String {
    element("TopicArn", &topic.arn)
}

pub fn topics_result(topics: &[Topic]) -> String {
    let members: String = topics
        .iter()
        .map(|topic| format!("<member>{}</member>", topic_arn_result(topic)))
        .collect();
    format!("<Topics>{members}</Topics>")
}

pub fn attributes_result(attributes: &BTreeMap<String, String>) -> String {
    let entries: String = attributes
        .iter()
        .map(|(key, value)| {
            format!(
                "<entry>{}{}</entry>",
                element("key", key),
                element("value", value)
            )
        })
        .collect();
    format!("<Attributes>{entries}</Attributes>")
}

pub fn subscriptions_result(subscriptions: &[Subscription]) -> String {
    let members: String = subscriptions
        .iter()
        .map(|subscription| {
            format!(
                "<member>{}{}{}{}{}</member>",
                element("TopicArn", &subscription.topic_arn),
                element("Protocol", &subscription.protocol),
                element("SubscriptionArn", &subscription.arn),
                element("Owner", &subscription.owner),
                element("Endpoint", &subscription.endpoint),
            )
        })
        .collect();
    format!("<Subscriptions>{members}</Subscriptions>")
}

impl SnsError {
    /// HTTP status an SNS client expects alongside this error's code
    pub fn status_code(&self) -> StatusCode {
        match self {
            SnsError::NotFound { .. } => StatusCode::NOT_FOUND,
            SnsError::InvalidParameterValue { .. } | SnsError::InvalidAction { .. } => {
                StatusCode::BAD_REQUEST
            }
            SnsError::Configuration { .. } | SnsError::InternalFailure { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_error_document(&self) -> String {
        let fault = if self.is_sender_fault() {
            "Sender"
        } else {
            "Receiver"
        };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><ErrorResponse xmlns="{SNS_XML_NAMESPACE}"><Error>{}{}{}</Error>{}</ErrorResponse>"#,
            element("Type", fault),
            element("Code", self.code()),
            element("Message", self.message()),
            element("RequestId", &Uuid::new_v4().to_string()),
        )
    }
}

impl IntoResponse for SnsError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(CONTENT_TYPE, XML_CONTENT_TYPE)],
            self.to_error_document(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::first_element_text;

    #[test]
    fn test_render_with_result() {
        let topic = Topic::new("arn:aws:sns:us-east-1:1:orders", "orders");
        let document = XmlResponse::with_result("CreateTopic", topic_arn_result(&topic)).render();

        assert!(document.contains(&format!(
            r#"<CreateTopicResponse xmlns="{SNS_XML_NAMESPACE}">"#
        )));
        assert!(document.contains(
            "<CreateTopicResult><TopicArn>arn:aws:sns:us-east-1:1:orders</TopicArn></CreateTopicResult>"
        ));
        assert!(first_element_text(&document, "RequestId").is_some());
    }

    #[test]
    fn test_render_without_result() {
        let document = XmlResponse::empty("DeleteTopic").render();
        assert!(!document.contains("DeleteTopicResult"));
        assert!(document.ends_with("</DeleteTopicResponse>"));
    }

    #[test]
    fn test_attributes_are_escaped() {
        let attributes = BTreeMap::from([("Policy".to_string(), "{\"a\":\"<b>\"}".to_string())]);
        let document = attributes_result(&attributes);
        assert!(document.contains("<key>Policy</key>"));
        assert!(document.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_error_document_and_status() {
        let err = SnsError::invalid_parameter("Topic Name: \"dot.dot\"");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let document = err.to_error_document();
        assert_eq!(first_element_text(&document, "Type").as_deref(), Some("Sender"));
        assert_eq!(
            first_element_text(&document, "Code").as_deref(),
            Some("InvalidParameterValue")
        );
        assert_eq!(
            first_element_text(&document, "Message").as_deref(),
            Some("Topic Name: \"dot.dot\"")
        );

        let internal = SnsError::internal("boom");
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            first_element_text(&internal.to_error_document(), "Type").as_deref(),
            Some("Receiver")
        );
        assert_eq!(
            SnsError::not_found("Topic does not exist").status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
