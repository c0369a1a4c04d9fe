//! Persona records.
//!
//! A persona is a named expert prompt template: a topic plus the system
//! prompt an LLM should adopt when speaking as that expert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Storage-assigned identifier (empty until persisted).
    #[serde(default)]
    pub id: String,

    /// Display name, e.g. "Data Scientist".
    pub name: String,

    /// Subject area the persona is an expert in.
    pub topic: String,

    /// System prompt used when this persona talks to an LLM.
    pub prompt: String,

    /// Short human-readable description.
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Persona {
    /// Build an unsaved persona.
    pub fn new(name: impl Into<String>, topic: impl Into<String>, prompt: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            name: name.into(),
            topic: topic.into(),
            prompt: prompt.into(),
            description: String::new(),
            tags: Vec::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
