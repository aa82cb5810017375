//! Core primitives.
//!
//! Identifiers and word-set helpers shared by the store, supply and deck
//! layers. Nothing in here performs I/O.

pub mod ids;
pub mod words;

// Re-export core types
pub use ids::{UserId, DeckId, Difficulty, ParseDifficultyError, CATEGORIES};
pub use words::{
    normalize_word, available_words, low_watermark, needs_background_refresh,
    DEFAULT_LOW_WATERMARK_DIVISOR,
};
