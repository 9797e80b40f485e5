//! # Request Handlers
//!
//! `POST /` dispatches on the `Action` form parameter the way SNS client SDKs
//! call it. The remaining routes are emulator controls.

use super::params::ActionParams;
use super::response_types::{
    attributes_result, subscriptions_result, topic_arn_result, topics_result, XmlResponse,
};
use super::state::AppState;
use crate::delivery::DeliveryReport;
use crate::error::{Result, SnsError};
use crate::models::{Message, NewMessage, Subscription, Topic};
use crate::xml::element;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, error, warn};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    topics: usize,
    subscriptions: usize,
    messages: usize,
}

/// Query-protocol endpoint: POST /
///
/// A body that is not form-encoded is answered with an SNS `ErrorResponse`
/// rather than axum's plain-text rejection.
pub async fn dispatch_action(
    State(state): State<AppState>,
    form: std::result::Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<XmlResponse> {
    let Form(params) = form.map_err(|rejection| {
        warn!(error = %rejection, "Rejected request body");
        SnsError::invalid_parameter(rejection.body_text())
    })?;
    let params = ActionParams::from(params);
    let action = params.action()?.to_string();
    debug!(action = %action, "Handling SNS action");

    let result = run_action(&state, &action, &params).await;
    if let Err(err) = &result {
        if err.is_sender_fault() {
            warn!(action = %action, code = err.code(), error = %err, "Action rejected");
        } else {
            error!(action = %action, code = err.code(), error = %err, "Action failed");
        }
    }
    result
}

async fn run_action(state: &AppState, action: &str, params: &ActionParams) -> Result<XmlResponse> {
    let emulator = &state.emulator;

    match action {
        "CreateTopic" => {
            let topic = emulator.create_topic(params.required("Name")?)?;
            Ok(XmlResponse::with_result("CreateTopic", topic_arn_result(&topic)))
        }
        "Publish" => {
            let request = NewMessage {
                message: params.required("Message")?.to_string(),
                message_structure: params.owned("MessageStructure"),
                subject: params.owned("Subject"),
                target_arn: params.owned("TargetArn"),
                topic_arn: params.owned("TopicArn"),
            };
            let published = emulator.publish(request).await?;
            Ok(XmlResponse::with_result(
                "Publish",
                element("MessageId", &published.message.id.to_string()),
            ))
        }
        "ListTopics" => Ok(XmlResponse::with_result(
            "ListTopics",
            topics_result(&emulator.list_topics()),
        )),
        "DeleteTopic" => {
            emulator.delete_topic(params.required("TopicArn")?)?;
            Ok(XmlResponse::empty("DeleteTopic"))
        }
        "GetTopicAttributes" => {
            let attributes = emulator.get_topic_attributes(params.required("TopicArn")?)?;
            Ok(XmlResponse::with_result(
                "GetTopicAttributes",
                attributes_result(&attributes),
            ))
        }
        "SetTopicAttributes" => {
            emulator.set_topic_attribute(
                params.required("TopicArn")?,
                params.required("AttributeName")?,
                params.optional("AttributeValue").unwrap_or_default(),
            )?;
            Ok(XmlResponse::empty("SetTopicAttributes"))
        }
        "Subscribe" => {
            let subscription = emulator.subscribe(
                params.required("TopicArn")?,
                params.optional("Protocol").unwrap_or_default(),
                params.optional("Endpoint").unwrap_or_default(),
            )?;
            Ok(XmlResponse::with_result(
                "Subscribe",
                element("SubscriptionArn", &subscription.arn),
            ))
        }
        "Unsubscribe" => {
            emulator.unsubscribe(params.required("SubscriptionArn")?)?;
            Ok(XmlResponse::empty("Unsubscribe"))
        }
        "GetSubscriptionAttributes" => {
            let attributes =
                emulator.get_subscription_attributes(params.required("SubscriptionArn")?)?;
            Ok(XmlResponse::with_result(
                "GetSubscriptionAttributes",
                attributes_result(&attributes),
            ))
        }
        "SetSubscriptionAttributes" => {
            emulator.set_subscription_attribute(
                params.required("SubscriptionArn")?,
                params.required("AttributeName")?,
                params.optional("AttributeValue").unwrap_or_default(),
            )?;
            Ok(XmlResponse::empty("SetSubscriptionAttributes"))
        }
        "ListSubscriptions" => Ok(XmlResponse::with_result(
            "ListSubscriptions",
            subscriptions_result(&emulator.list_subscriptions()?),
        )),
        "ListSubscriptionsByTopic" => {
            let subscriptions = emulator.list_subscriptions_by_topic(params.required("TopicArn")?)?;
            Ok(XmlResponse::with_result(
                "ListSubscriptionsByTopic",
                subscriptions_result(&subscriptions),
            ))
        }
        other => Err(SnsError::invalid_action(other)),
    }
}

/// Deliver every stored message: POST /drain
pub async fn drain(State(state): State<AppState>) -> Json<DeliveryReport> {
    Json(state.emulator.drain().await)
}

/// Forget all topics, subscriptions and messages: DELETE /
pub async fn reset(State(state): State<AppState>) -> StatusCode {
    state.emulator.reset();
    StatusCode::OK
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.emulator.store();
    Json(HealthResponse {
        status: "healthy",
        topics: store.count::<Topic>(),
        subscriptions: store.count::<Subscription>(),
        messages: store.count::<Message>(),
    })
}
