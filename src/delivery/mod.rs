//! # Delivery Module
//!
//! Fan-out of stored messages to subscriber endpoints. The dispatcher picks a
//! transport adapter from the subscription's protocol; the structure resolver
//! decides which payload each protocol receives.

pub mod dispatcher;
pub mod envelope;
pub mod errors;
pub mod protocol;
pub mod structure;
pub mod transport;

pub use dispatcher::{DeliveryDispatcher, DeliveryFailure, DeliveryOutcome, DeliveryReport};
pub use envelope::NotificationEnvelope;
pub use errors::{DeliveryError, DeliveryResult};
pub use protocol::{DeliveryProtocol, UnimplementedProtocol};
pub use structure::resolve_body;
pub use transport::{
    split_queue_endpoint, HttpTransport, QueueTransport, ReqwestHttpTransport,
    ReqwestQueueTransport,
};
