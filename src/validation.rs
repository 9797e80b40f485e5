//! Input validation for topic and publish actions
//!
//! Every check here runs before the store is touched, so a rejected request
//! never leaves a partial write behind.

use crate::constants::MAX_MESSAGE_BYTES;
use crate::error::{Result, SnsError};
use regex::Regex;
use std::sync::LazyLock;

static TOPIC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("topic name pattern is valid"));

/// Mobile push endpoints of the `DebugApp` application whose id contains
/// `endpointdisabled` simulate a disabled device
static DISABLED_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"arn:aws:sns:[a-z0-9\-]+:[0-9]+:endpoint/(GCM|APNS|APNS_SANDBOX)/DebugApp/endpointdisabled",
    )
    .expect("disabled endpoint pattern is valid")
});

/// Topic names are ASCII letters, digits, underscores and hyphens
pub fn validate_topic_name(name: &str) -> Result<()> {
    if TOPIC_NAME.is_match(name) {
        Ok(())
    } else {
        Err(SnsError::invalid_parameter(format!("Topic Name: {name:?}")))
    }
}

/// Message bodies are limited by UTF-8 byte length, not character count
pub fn validate_message_size(message: &str) -> Result<()> {
    let bytes = message.len();
    if bytes > MAX_MESSAGE_BYTES {
        return Err(SnsError::invalid_parameter(format!(
            "Too much bytes: {bytes} > {MAX_MESSAGE_BYTES}."
        )));
    }
    Ok(())
}

/// Whether `target_arn` names a simulated disabled push endpoint.
///
/// An absent or empty target never matches.
pub fn is_disabled_endpoint(target_arn: Option<&str>) -> bool {
    match target_arn {
        Some(arn) if !arn.is_empty() => DISABLED_ENDPOINT.is_match(arn),
        _ => false,
    }
}

pub fn validate_endpoint_enabled(target_arn: Option<&str>) -> Result<()> {
    if is_disabled_endpoint(target_arn) {
        return Err(SnsError::invalid_parameter(
            "EndpointDisabled: Endpoint is disabled",
        ));
    }
    Ok(())
}
