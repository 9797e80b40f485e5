//! # Delivery Error Types
//!
//! Failures of a single (subscription, message) delivery attempt. They are
//! contained to that attempt: Publish logs them and still succeeds.

use crate::error::SnsError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeliveryError {
    #[error("Protocol {protocol} not supported")]
    UnsupportedProtocol { protocol: String },

    #[error("Malformed structured message {message_id}: {reason}")]
    MalformedStructure { message_id: String, reason: String },

    #[error("HTTP delivery to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("Invalid queue endpoint: {endpoint}")]
    InvalidQueueEndpoint { endpoint: String },

    #[error("Queue not found: {queue_name}")]
    QueueNotFound { queue_name: String },

    #[error("Queue operation failed: {queue_name}: {operation}: {message}")]
    QueueOperation {
        queue_name: String,
        operation: String,
        message: String,
    },
}

impl DeliveryError {
    pub fn unsupported_protocol(protocol: impl Into<String>) -> Self {
        Self::UnsupportedProtocol {
            protocol: protocol.into(),
        }
    }

    pub fn malformed_structure(message_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStructure {
            message_id: message_id.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn invalid_queue_endpoint(endpoint: impl Into<String>) -> Self {
        Self::InvalidQueueEndpoint {
            endpoint: endpoint.into(),
        }
    }

    pub fn queue_not_found(queue_name: impl Into<String>) -> Self {
        Self::QueueNotFound {
            queue_name: queue_name.into(),
        }
    }

    pub fn queue_operation(
        queue_name: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::QueueOperation {
            queue_name: queue_name.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// SNS fault code this failure maps to when reported to a caller
    pub fn code(&self) -> &'static str {
        match self {
            DeliveryError::UnsupportedProtocol { .. } | DeliveryError::MalformedStructure { .. } => {
                "InvalidParameterValue"
            }
            _ => "InternalFailure",
        }
    }
}

impl From<DeliveryError> for SnsError {
    fn from(err: DeliveryError) -> Self {
        match err.code() {
            "InvalidParameterValue" => SnsError::invalid_parameter(err.to_string()),
            _ => SnsError::internal(err.to_string()),
        }
    }
}

pub type DeliveryResult<T> = Result<T, DeliveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_faults_map_to_invalid_parameter() {
        let err: SnsError = DeliveryError::unsupported_protocol("carrier-pigeon").into();
        assert_eq!(err.code(), "InvalidParameterValue");
        assert!(err.message().contains("carrier-pigeon"));

        let err: SnsError = DeliveryError::malformed_structure("id", "no default").into();
        assert_eq!(err.code(), "InvalidParameterValue");
    }

    #[test]
    fn test_transport_faults_map_to_internal_failure() {
        let err: SnsError = DeliveryError::transport("http://x", "refused").into();
        assert_eq!(err.code(), "InternalFailure");

        let err: SnsError = DeliveryError::queue_not_found("missing").into();
        assert_eq!(err.code(), "InternalFailure");
    }

    #[test]
    fn test_error_display() {
        let err = DeliveryError::queue_operation("orders", "SendMessage", "503");
        let display_str = format!("{err}");
        assert!(display_str.contains("orders"));
        assert!(display_str.contains("SendMessage"));
        assert!(display_str.contains("503"));
    }
}
