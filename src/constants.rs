//! # System Constants
//!
//! Fixed values that define the emulated service's limits, defaults and the
//! wire vocabulary shared between the publish pipeline and the HTTP layer.

/// Largest accepted message body, measured in UTF-8 bytes
pub const MAX_MESSAGE_BYTES: usize = 262_144;

/// Region used in ARNs when no override is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Address the bundled server listens on when no override is configured
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:9292";

/// ARN partition and service segments
pub const ARN_PARTITION: &str = "aws";
pub const ARN_SERVICE: &str = "sns";

/// The only `MessageStructure` value with special meaning
pub const MESSAGE_STRUCTURE_JSON: &str = "json";

/// Key consulted in a structured message when the protocol has no entry
pub const STRUCTURED_DEFAULT_KEY: &str = "default";

/// Environment overrides, named as the emulated service's test harnesses expect
pub mod env {
    pub const REGION: &str = "fake_sns_region";
    pub const ACCOUNT: &str = "fake_sns_account";
    pub const AUTO_DELIVER: &str = "fake_sns_auto_deliver";
    pub const BIND_ADDRESS: &str = "FAKE_SNS_BIND_ADDRESS";
    pub const ENVIRONMENT: &str = "FAKE_SNS_ENV";
    pub const LOG_FORMAT: &str = "FAKE_SNS_LOG_FORMAT";
}

/// Fields of the HTTP notification envelope that never vary
pub mod notification {
    pub const TYPE: &str = "Notification";
    pub const SIGNATURE_VERSION: &str = "1";
    pub const SIGNATURE: &str = "Fake";
    pub const SIGNING_CERT_URL: &str =
        "https://sns.us-east-1.amazonaws.com/SimpleNotificationService-f3ecfb7224c7233fe7bb5f59f96de52f.pem";
    pub const UNSUBSCRIBE_URL: &str = "";
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
}

/// Headers attached to every HTTP notification POST
pub mod headers {
    pub const MESSAGE_TYPE: &str = "x-amz-sns-message-type";
    pub const MESSAGE_ID: &str = "x-amz-sns-message-id";
    pub const TOPIC_ARN: &str = "x-amz-sns-topic-arn";
    pub const SUBSCRIPTION_ARN: &str = "x-amz-sns-subscription-arn";
    pub const RAW_DELIVERY: &str = "x-amz-sns-rawdelivery";
}

/// XML namespace used in every SNS query-protocol response
pub const SNS_XML_NAMESPACE: &str = "http://sns.amazonaws.com/doc/2010-03-31/";

/// API version sent to queue endpoints
pub const SQS_API_VERSION: &str = "2012-11-05";
