//! Form parameters of a query-protocol request.

use crate::error::{Result, SnsError};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ActionParams(HashMap<String, String>);

impl From<HashMap<String, String>> for ActionParams {
    fn from(params: HashMap<String, String>) -> Self {
        Self(params)
    }
}

impl ActionParams {
    /// The `Action` parameter naming the operation
    pub fn action(&self) -> Result<&str> {
        self.optional("Action")
            .ok_or_else(|| SnsError::invalid_action("(missing)"))
    }

    pub fn required(&self, name: &str) -> Result<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SnsError::invalid_parameter(format!("{name} is required")))
    }

    pub fn optional(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Like [`optional`](Self::optional), with empty values treated as absent
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.optional(name).filter(|value| !value.is_empty())
    }

    pub fn owned(&self, name: &str) -> Option<String> {
        self.non_empty(name).map(str::to_string)
    }
}
