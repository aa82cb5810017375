//! Deck Documents
//!
//! Typed views of the master and user deck documents.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::available_words;
use crate::store::{Document, StoreError};

// =============================================================================
// MASTER DECK
// =============================================================================

/// Shared, ever-growing word pool for one deck id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDeck {
    /// Every word ever generated for this deck.
    #[serde(default)]
    pub all_words: BTreeSet<String>,
    /// Last merge time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MasterDeck {
    /// Decode a stored document. `None` when the document is absent.
    pub fn from_document(doc: Option<&Document>) -> Result<Option<Self>, StoreError> {
        Ok(doc.map(|d| serde_json::from_value(d.clone())).transpose()?)
    }

    /// Encode for storage.
    pub fn to_document(&self) -> Result<Document, StoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// True when the pool holds no words.
    pub fn is_empty(&self) -> bool {
        self.all_words.is_empty()
    }

    /// Union `words` into the pool. Returns how many were new.
    pub fn merge(&mut self, words: &[String]) -> usize {
        words
            .iter()
            .filter(|w| self.all_words.insert((*w).clone()))
            .count()
    }
}

// =============================================================================
// USER DECK
// =============================================================================

/// One user's copy of a deck and the words they have already played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDeck {
    /// Known words, in serving order.
    #[serde(default)]
    pub all_words: Vec<String>,
    /// Words this user has played.
    #[serde(default)]
    pub seen_words: BTreeSet<String>,
    /// Last seed or refill time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserDeck {
    /// Fresh deck holding every master word, none seen.
    pub fn seeded_from(master: &MasterDeck) -> Self {
        Self {
            all_words: master.all_words.iter().cloned().collect(),
            seen_words: BTreeSet::new(),
            updated_at: Some(Utc::now()),
        }
    }

    /// Decode a stored document. `None` when the document is absent.
    pub fn from_document(doc: Option<&Document>) -> Result<Option<Self>, StoreError> {
        Ok(doc.map(|d| serde_json::from_value(d.clone())).transpose()?)
    }

    /// Encode for storage.
    pub fn to_document(&self) -> Result<Document, StoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Unseen words, in deck order.
    pub fn available(&self) -> Vec<String> {
        available_words(&self.all_words, &self.seen_words)
    }

    /// Record a played word. Returns false if it was already recorded.
    pub fn mark_seen(&mut self, word: &str) -> bool {
        self.seen_words.insert(word.to_string())
    }

    /// Append `words` not already in the deck and clear the seen set.
    ///
    /// Returns how many words were appended.
    pub fn refill(&mut self, words: &[String]) -> usize {
        let mut known: BTreeSet<String> = self.all_words.iter().cloned().collect();
        let before = self.all_words.len();
        for word in words {
            if known.insert(word.clone()) {
                self.all_words.push(word.clone());
            }
        }
        self.seen_words.clear();
        self.all_words.len() - before
    }
}
