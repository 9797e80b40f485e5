pub mod message;
pub mod subscription;
pub mod topic;

// Re-export core models for easy access
pub use message::{Message, NewMessage};
pub use subscription::Subscription;
pub use topic::Topic;
