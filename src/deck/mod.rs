//! Deck Cache
//!
//! Two-tier word cache: a shared master deck per deck id, and a private copy
//! per user that tracks which words the user has already played.
//!
//! ## Module Structure
//!
//! - `model`: master/user deck documents
//! - `manager`: `get_deck`, `mark_seen`, seeding, background refresh
//! - `refresh`: the refill protocol (batch fetch + transactional merge)

pub mod manager;
pub mod model;
pub mod refresh;

use serde::{Deserialize, Serialize};

use crate::core::{DeckId, UserId};
use crate::store::StoreError;

pub use manager::{wait_for_background_refreshes, DeckCacheManager, DeckConfig};
pub use model::{MasterDeck, UserDeck};

/// Things that happened to a deck. Broadcast to subscribers; nobody is
/// required to listen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeckEvent {
    /// A user deck was created.
    Seeded {
        deck_id: DeckId,
        user_id: UserId,
        total_words: usize,
    },

    /// New words were merged into the master and user decks.
    Refreshed {
        deck_id: DeckId,
        user_id: UserId,
        new_words: usize,
        total_words: usize,
    },

    /// No new words arrived; the existing user deck was kept.
    RefreshSkipped {
        deck_id: DeckId,
        user_id: UserId,
        total_words: usize,
    },

    /// A low-watermark refresh was spawned.
    BackgroundRefreshScheduled {
        deck_id: DeckId,
        user_id: UserId,
    },

    /// A background refresh completed.
    BackgroundRefreshFinished {
        deck_id: DeckId,
        user_id: UserId,
        total_words: usize,
    },

    /// A background refresh failed. Not retried.
    BackgroundRefreshFailed {
        deck_id: DeckId,
        user_id: UserId,
        reason: String,
    },
}

/// Refresh errors.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// No batch produced a usable word and the user had nothing to fall back on.
    #[error("Word supply returned no new words for {deck_id}")]
    SupplyExhausted {
        /// Deck being refreshed.
        deck_id: DeckId,
    },

    /// Reading or committing deck documents failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors surfaced by [`DeckCacheManager::get_deck`].
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// No playable words even after seeding and refreshing.
    #[error("Deck {deck_id} is unavailable")]
    DeckUnavailable {
        /// Deck requested.
        deck_id: DeckId,
        /// Why seeding or refreshing failed, if it did.
        #[source]
        source: Option<RefreshError>,
    },

    /// The user deck could not be read.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl DeckError {
    pub(crate) fn unavailable(deck_id: &DeckId, cause: RefreshError) -> Self {
        DeckError::DeckUnavailable {
            deck_id: deck_id.clone(),
            source: Some(cause),
        }
    }
}
