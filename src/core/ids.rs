//! Identifiers
//!
//! User identities, difficulty levels and the deck id that joins a
//! user's private deck to the shared master deck.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// USER ID
// =============================================================================

/// Opaque user identity, as handed out by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random identity for an anonymous sign-in.
    pub fn anonymous() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// DIFFICULTY
// =============================================================================

/// Difficulty level of a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum Difficulty {
    /// Well-known words.
    #[default]
    Easy,
    /// Moderately obscure words.
    Medium,
    /// Hard words.
    Hard,
}

impl Difficulty {
    /// All difficulty levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Name as sent to the word-supply service.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown difficulty name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0:?}")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

/// Stock categories offered on the menu. Any other string is also accepted.
pub const CATEGORIES: [&str; 6] = [
    "Movies",
    "Celebrities",
    "Animals",
    "Random Words",
    "Science",
    "History",
];

// =============================================================================
// DECK ID
// =============================================================================

/// Deck identifier: `lowercase(category + "_" + difficulty)`.
///
/// Shared by the master deck and every user deck of the same
/// category/difficulty pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeckId(String);

impl DeckId {
    /// Derive the id for a category/difficulty pair.
    pub fn new(category: &str, difficulty: Difficulty) -> Self {
        Self(format!("{}_{}", category, difficulty.as_str()).to_lowercase())
    }

    /// Borrow the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
