//! Deck Refresh
//!
//! Refill protocol shared by seeding, the empty-deck path and background
//! refreshes:
//!
//! 1. Read master and user decks concurrently.
//! 2. Fetch new words in sequential batches, excluding everything either deck
//!    already holds.
//! 3. Commit master-union + user-refill in a single transaction.

use std::collections::BTreeSet;

use chrono::Utc;
use futures_util::future::try_join;
use tracing::{info, instrument, warn};

use crate::core::{DeckId, Difficulty, UserId};
use crate::store::{DocKey, StoreError, TxnSnapshot, TxnWrite};

use super::manager::DeckCacheManager;
use super::model::{MasterDeck, UserDeck};
use super::{DeckEvent, RefreshError};

impl DeckCacheManager {
    /// Refill a user's deck from the word supply.
    ///
    /// Returns the committed user deck with every word available again. If no
    /// new words arrive, an existing user deck is returned untouched; with no
    /// existing words this fails with [`RefreshError::SupplyExhausted`].
    #[instrument(skip(self), fields(user = %user_id, difficulty = %difficulty))]
    pub async fn refresh(
        &self,
        user_id: &UserId,
        category: &str,
        difficulty: Difficulty,
    ) -> Result<UserDeck, RefreshError> {
        let deck_id = DeckId::new(category, difficulty);
        let master_key = DocKey::master_deck(&deck_id);
        let user_key = DocKey::user_deck(user_id, &deck_id);
        info!("Refilling {}", deck_id);

        let store = &self.inner.store;
        let (master_doc, user_doc) = try_join(store.read(&master_key), store.read(&user_key)).await?;
        let master = MasterDeck::from_document(master_doc.as_ref())?.unwrap_or_default();
        let user_deck = UserDeck::from_document(user_doc.as_ref())?.unwrap_or_default();

        let mut exclusions: BTreeSet<String> = master
            .all_words
            .iter()
            .chain(user_deck.all_words.iter())
            .cloned()
            .collect();
        let new_words = self
            .inner
            .supply
            .fetch_new_words(category, difficulty, &mut exclusions)
            .await;

        if new_words.is_empty() {
            if !user_deck.all_words.is_empty() {
                warn!(
                    "No new words for {}, keeping {} existing",
                    deck_id,
                    user_deck.all_words.len()
                );
                self.emit(DeckEvent::RefreshSkipped {
                    deck_id,
                    user_id: user_id.clone(),
                    total_words: user_deck.all_words.len(),
                });
                return Ok(user_deck);
            }
            return Err(RefreshError::SupplyExhausted { deck_id });
        }

        let now = Utc::now();
        let keys = [master_key.clone(), user_key.clone()];
        let commit = store
            .transaction(&keys, &|snapshot: &TxnSnapshot| {
                let mut master = MasterDeck::from_document(snapshot.get(&master_key))?.unwrap_or_default();
                master.merge(&new_words);
                master.updated_at = Some(now);

                let mut user = UserDeck::from_document(snapshot.get(&user_key))?.unwrap_or_default();
                user.refill(&new_words);
                user.updated_at = Some(now);

                Ok(vec![
                    TxnWrite::new(master_key.clone(), master.to_document()?),
                    TxnWrite::new(user_key.clone(), user.to_document()?),
                ])
            })
            .await?;

        let refreshed = UserDeck::from_document(commit.get(&user_key))?
            .ok_or_else(|| StoreError::Unavailable(format!("commit did not write {}", user_key)))?;

        info!(
            "Merged {} new words into {}; user deck now {} words",
            new_words.len(),
            deck_id,
            refreshed.all_words.len()
        );
        self.emit(DeckEvent::Refreshed {
            deck_id,
            user_id: user_id.clone(),
            new_words: new_words.len(),
            total_words: refreshed.all_words.len(),
        });
        Ok(refreshed)
    }
}

// =============================================================================
// TESTS
// =============================================================================
