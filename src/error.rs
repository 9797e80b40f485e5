//! # Error Types
//!
//! Errors surfaced to API callers. Every variant maps onto the fault code an
//! SNS client SDK expects to find in an error response, so the wire layer can
//! render them without guessing.

use thiserror::Error;

/// Caller-visible errors for topic, subscription and publish actions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnsError {
    #[error("Invalid parameter: {message}")]
    InvalidParameterValue { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Unknown action: {action}")]
    InvalidAction { action: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal failure: {message}")]
    InternalFailure { message: String },
}

impl SnsError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameterValue {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an invalid action error
    pub fn invalid_action(action: impl Into<String>) -> Self {
        Self::InvalidAction {
            action: action.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalFailure {
            message: message.into(),
        }
    }

    /// SNS fault code carried in the `<Code>` element of an error response
    pub fn code(&self) -> &'static str {
        match self {
            SnsError::InvalidParameterValue { .. } => "InvalidParameterValue",
            SnsError::NotFound { .. } => "NotFound",
            SnsError::InvalidAction { .. } => "InvalidAction",
            SnsError::Configuration { .. } | SnsError::InternalFailure { .. } => "InternalFailure",
        }
    }

    /// Human-readable detail without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            SnsError::InvalidParameterValue { message }
            | SnsError::NotFound { message }
            | SnsError::Configuration { message }
            | SnsError::InternalFailure { message } => message,
            SnsError::InvalidAction { action } => action,
        }
    }

    /// Whether the caller, rather than the emulator, caused the error
    pub fn is_sender_fault(&self) -> bool {
        matches!(
            self,
            SnsError::InvalidParameterValue { .. }
                | SnsError::NotFound { .. }
                | SnsError::InvalidAction { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SnsError>;
