#![allow(clippy::doc_markdown)] // Allow technical terms like SNS, SQS in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Fake SNS
//!
//! Local, in-process emulator of the SNS publish/subscribe API for development
//! and test environments.
//!
//! ## Overview
//!
//! Topics, subscriptions and published messages live in an in-memory store.
//! Publishing a message can deliver it straight away (auto-delivery) or leave
//! it stored until a drain is requested. Delivery POSTs a notification
//! envelope to `http`/`https` subscribers and enqueues the raw body on `sqs`
//! subscribers' queues; the remaining SNS protocols are recognized and
//! skipped.
//!
//! ## Module Organization
//!
//! - [`actions`] - CreateTopic, Publish and the topic/subscription management actions
//! - [`arn`] - Region/account aware ARN construction
//! - [`config`] - Environment-driven configuration, re-read per operation
//! - [`delivery`] - Structured message resolution and protocol dispatch
//! - [`emulator`] - Facade tying store, configuration and delivery together
//! - [`store`] - Thread-safe in-memory tables
//! - [`web`] - SNS query-protocol HTTP API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fake_sns::{NewMessage, SnsConfig, SnsEmulator};
//!
//! # async fn example() -> fake_sns::Result<()> {
//! let emulator = SnsEmulator::with_config(SnsConfig::default().with_auto_deliver(true));
//! let topic = emulator.create_topic("orders")?;
//! emulator.subscribe(&topic.arn, "https", "https://localhost:8443/hooks/orders")?;
//!
//! let published = emulator
//!     .publish(NewMessage::new("order placed").to_topic(&topic.arn))
//!     .await?;
//! println!("published {}", published.message.id);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod arn;
pub mod config;
pub mod constants;
pub mod delivery;
pub mod emulator;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod validation;
pub mod web;
pub mod xml;

pub use actions::{CreateTopic, Publish, PublishResult, SubscriptionActions, TopicActions};
pub use arn::ArnResolver;
pub use config::{ConfigSource, EnvConfigSource, SnsConfig};
pub use delivery::{
    DeliveryDispatcher, DeliveryError, DeliveryOutcome, DeliveryReport, HttpTransport,
    QueueTransport,
};
pub use emulator::SnsEmulator;
pub use error::{Result, SnsError};
pub use models::{Message, NewMessage, Subscription, Topic};
pub use store::MemoryStore;
