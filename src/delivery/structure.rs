//! Per-protocol payload selection.
//!
//! A message published with `MessageStructure=json` carries a JSON object
//! whose keys are protocol names. Each subscriber receives the value under its
//! protocol, or under `default` when its protocol has no entry. The structure
//! is only checked here, at delivery time; Publish accepts it unexamined.

use super::errors::{DeliveryError, DeliveryResult};
use crate::constants::STRUCTURED_DEFAULT_KEY;
use crate::models::Message;
use serde_json::{Map, Value};

/// Body delivered to a subscriber speaking `protocol`
pub fn resolve_body(message: &Message, protocol: &str) -> DeliveryResult<String> {
    if !message.is_structured() {
        return Ok(message.message.clone());
    }

    let message_id = message.id.to_string();
    let bodies: Map<String, Value> = serde_json::from_str(&message.message).map_err(|e| {
        DeliveryError::malformed_structure(&message_id, format!("body is not a JSON object: {e}"))
    })?;

    let value = bodies
        .get(protocol)
        .or_else(|| bodies.get(STRUCTURED_DEFAULT_KEY))
        .ok_or_else(|| {
            DeliveryError::malformed_structure(
                &message_id,
                format!("no entry for protocol {protocol:?} and no {STRUCTURED_DEFAULT_KEY:?} entry"),
            )
        })?;

    match value {
        Value::String(body) => Ok(body.clone()),
        other => Err(DeliveryError::malformed_structure(
            &message_id,
            format!("entry for {protocol:?} must be a string, got {other}"),
        )),
    }
}
