use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named channel that subscriptions attach to and publishes target.
///
/// Identity is the ARN; uniqueness is enforced on `name` by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub arn: String,
    pub name: String,
    /// Attributes written by SetTopicAttributes, such as `DisplayName`
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Topic {
    pub fn new(arn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
