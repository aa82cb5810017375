//! Document Store
//!
//! Abstract key/document store the deck cache runs on. Any backend that can
//! read a document, fully replace a document, and atomically commit a set of
//! writes computed from a consistent snapshot can sit behind [`DocumentStore`].
//!
//! ## Keys
//!
//! ```text
//! artifacts/heads-up-v1/public/data/decks/{deckId}           -> MasterDeck
//! artifacts/heads-up-v1/users/{userId}/userDecks/{deckId}    -> UserDeck
//! ```

pub mod memory;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{DeckId, UserId};

pub use memory::MemoryStore;

/// Root of every document path.
pub const APP_NAMESPACE: &str = "artifacts/heads-up-v1";

/// A stored document. Always a JSON object.
pub type Document = serde_json::Value;

// =============================================================================
// KEYS
// =============================================================================

/// Document key (a slash-separated path).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocKey(String);

impl DocKey {
    /// Key of the shared master deck.
    pub fn master_deck(deck_id: &DeckId) -> Self {
        Self(format!("{}/public/data/decks/{}", APP_NAMESPACE, deck_id))
    }

    /// Key of one user's private copy of a deck.
    pub fn user_deck(user_id: &UserId, deck_id: &DeckId) -> Self {
        Self(format!("{}/users/{}/userDecks/{}", APP_NAMESPACE, user_id, deck_id))
    }

    /// Borrow the raw path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Consistent view of a transaction's read set.
#[derive(Debug, Clone, Default)]
pub struct TxnSnapshot {
    docs: BTreeMap<DocKey, Option<Document>>,
}

impl TxnSnapshot {
    /// Build a snapshot from read results.
    pub fn new(docs: BTreeMap<DocKey, Option<Document>>) -> Self {
        Self { docs }
    }

    /// Document under `key`, if it was read and exists.
    pub fn get(&self, key: &DocKey) -> Option<&Document> {
        self.docs.get(key).and_then(|d| d.as_ref())
    }

    /// Whether `key` is part of the read set.
    pub fn contains(&self, key: &DocKey) -> bool {
        self.docs.contains_key(key)
    }
}

/// A single full-replace write produced by a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TxnWrite {
    /// Target key (must be in the read set).
    pub key: DocKey,
    /// New document contents.
    pub doc: Document,
}

impl TxnWrite {
    /// Create a write.
    pub fn new(key: DocKey, doc: Document) -> Self {
        Self { key, doc }
    }
}

/// Writes that were committed by a transaction.
#[derive(Debug, Clone, Default)]
pub struct TxnCommit {
    writes: BTreeMap<DocKey, Document>,
}

impl TxnCommit {
    /// Collect committed writes.
    pub fn new(writes: impl IntoIterator<Item = TxnWrite>) -> Self {
        Self {
            writes: writes.into_iter().map(|w| (w.key, w.doc)).collect(),
        }
    }

    /// Committed document under `key`, if the transaction wrote it.
    pub fn get(&self, key: &DocKey) -> Option<&Document> {
        self.writes.get(key)
    }

    /// Number of documents written.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// True when the transaction wrote nothing.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Function computing a transaction's writes from its snapshot.
///
/// May run more than once when the store retries after a conflict.
pub type TxnFn<'a> = &'a (dyn Fn(&TxnSnapshot) -> Result<Vec<TxnWrite>, StoreError> + Send + Sync);

// =============================================================================
// STORE CONTRACT
// =============================================================================

/// Key/document store with atomic multi-key transactions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document. `Ok(None)` when absent.
    async fn read(&self, key: &DocKey) -> Result<Option<Document>, StoreError>;

    /// Replace a document.
    async fn write(&self, key: &DocKey, doc: Document) -> Result<(), StoreError>;

    /// Atomically read `keys`, compute writes with `apply`, and commit them.
    ///
    /// Conflicting commits by other writers cause a re-read and a fresh call
    /// to `apply`; the store gives up with [`StoreError::Contention`] after a
    /// bounded number of attempts.
    async fn transaction(&self, keys: &[DocKey], apply: TxnFn<'_>) -> Result<TxnCommit, StoreError>;
}

/// Store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error in a persisted store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transaction kept conflicting with concurrent writers.
    #[error("Transaction aborted after {attempts} conflicting attempts")]
    Contention {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Transaction tried to write a key it never read.
    #[error("Write to key outside the read set: {0}")]
    UnreadKey(DocKey),

    /// Backend-specific failure.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
