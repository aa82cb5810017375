//! Word Supply Protocol
//!
//! JSON bodies exchanged with the word-generation service.

use serde::{Deserialize, Serialize};

/// Request for one batch of candidate words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Category name, as displayed.
    pub category: String,
    /// Difficulty name (`Easy`, `Medium`, `Hard`).
    pub difficulty: String,
    /// Number of words wanted.
    pub count: usize,
    /// Words the service should not return.
    pub existing_words: Vec<String>,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Candidate words, untrimmed.
    pub words: Vec<String>,
}

impl GenerateRequest {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl GenerateResponse {
    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
