//! # Heads Up Deck Cache
//!
//! Word-deck cache and AI replenishment for the Heads Up party game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HEADS UP DECK CACHE                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Identifiers and word helpers              │
//! │  ├── ids.rs      - UserId, DeckId, Difficulty, categories    │
//! │  └── words.rs    - Normalization, availability, watermark    │
//! │                                                              │
//! │  store/          - Document store contract                   │
//! │  └── memory.rs   - Versioned in-memory store (+ JSON file)   │
//! │                                                              │
//! │  supply/         - Word Supply Client                        │
//! │  ├── protocol.rs - Request/response bodies                   │
//! │  ├── http.rs     - HTTP transport                            │
//! │  └── client.rs   - Batched fetch with deduplication          │
//! │                                                              │
//! │  deck/           - Deck Cache Manager                        │
//! │  ├── model.rs    - Master and user deck documents            │
//! │  ├── manager.rs  - get_deck, mark_seen, background refresh   │
//! │  └── refresh.rs  - Transactional refill                      │
//! │                                                              │
//! │  game/           - Round scoring                             │
//! │  └── round.rs    - Correct/skip tally, played words          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cache Tiers
//!
//! Every deck id (`{category}_{difficulty}`) has one shared master deck that
//! only ever grows, and one private deck per user recording which words that
//! user has already played. Users are served their unseen words; when those
//! run low the deck is topped up from the word supply in the background.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod deck;
pub mod game;
pub mod store;
pub mod supply;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use core::{DeckId, Difficulty, UserId, CATEGORIES};
pub use deck::{wait_for_background_refreshes, DeckCacheManager, DeckConfig, DeckError, DeckEvent, RefreshError};
pub use game::{Outcome, Round, RoundResults, RoundStatus};
pub use store::{DocumentStore, MemoryStore, StoreError};
pub use supply::{HttpWordSupply, SupplyConfig, SupplyError, WordSupply, WordSupplyClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
