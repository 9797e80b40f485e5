//! Subscription protocol vocabulary.
//!
//! Parsing is exact and case-sensitive: `email-json` is recognized,
//! `email_json` and `HTTP` are not.

use super::errors::DeliveryError;
use std::fmt;
use std::str::FromStr;

/// Protocols that are recognized but only logged, never delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnimplementedProtocol {
    Email,
    EmailJson,
    Sms,
    Application,
}

impl UnimplementedProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnimplementedProtocol::Email => "email",
            UnimplementedProtocol::EmailJson => "email-json",
            UnimplementedProtocol::Sms => "sms",
            UnimplementedProtocol::Application => "application",
        }
    }
}

/// Transport adapter selected for a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryProtocol {
    Http,
    Https,
    Sqs,
    Unimplemented(UnimplementedProtocol),
}

impl DeliveryProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryProtocol::Http => "http",
            DeliveryProtocol::Https => "https",
            DeliveryProtocol::Sqs => "sqs",
            DeliveryProtocol::Unimplemented(protocol) => protocol.as_str(),
        }
    }
}

impl FromStr for DeliveryProtocol {
    type Err = DeliveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(DeliveryProtocol::Http),
            "https" => Ok(DeliveryProtocol::Https),
            "sqs" => Ok(DeliveryProtocol::Sqs),
            "email" => Ok(DeliveryProtocol::Unimplemented(UnimplementedProtocol::Email)),
            "email-json" => Ok(DeliveryProtocol::Unimplemented(
                UnimplementedProtocol::EmailJson,
            )),
            "sms" => Ok(DeliveryProtocol::Unimplemented(UnimplementedProtocol::Sms)),
            "application" => Ok(DeliveryProtocol::Unimplemented(
                UnimplementedProtocol::Application,
            )),
            other => Err(DeliveryError::unsupported_protocol(other)),
        }
    }
}

impl fmt::Display for DeliveryProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
