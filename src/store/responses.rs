//! Bounded, order-preserving set of successful responses
//!
//! Insertion appends; once more than `MAX_SUCCESSFUL_RESPONSES` are held
//! the oldest is evicted. A response already present is left where it is.

use crate::errors::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum responses remembered per pattern
pub const MAX_SUCCESSFUL_RESPONSES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    items: VecDeque<String>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(MAX_SUCCESSFUL_RESPONSES + 1),
        }
    }

    /// Add a response. Returns false when it was already present.
    pub fn insert(&mut self, response: impl Into<String>) -> bool {
        let response = response.into();
        if self.contains(&response) {
            return false;
        }

        self.items.push_back(response);
        while self.items.len() > MAX_SUCCESSFUL_RESPONSES {
            self.items.pop_front();
        }
        true
    }

    pub fn contains(&self, response: &str) -> bool {
        self.items.iter().any(|r| r == response)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.items.iter()
    }

    /// Up to `limit` responses in stored order
    pub fn first(&self, limit: usize) -> Vec<String> {
        self.items.iter().take(limit).cloned().collect()
    }

    /// Column encoding: JSON array of strings
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.items)?)
    }

    /// Decode the column and re-apply the set rules, so a hand-edited
    /// row cannot smuggle in duplicates or exceed the cap.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<String> = serde_json::from_str(json)
            .map_err(|e| AgentError::JsonParseError(format!("successful_responses: {}", e)))?;
        Ok(raw.into_iter().collect())
    }
}

impl FromIterator<String> for ResponseSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = ResponseSet::new();
        for response in iter {
            set.insert(response);
        }
        set
    }
}
