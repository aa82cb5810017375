//! Deck Cache Manager
//!
//! Hands out playable word lists for a (user, category, difficulty) triple.
//! Seeds a user's deck from the shared master deck on first use, refills it
//! synchronously when it runs dry, and schedules a detached refill when it
//! drops below its low watermark.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::core::{needs_background_refresh, DeckId, Difficulty, UserId, DEFAULT_LOW_WATERMARK_DIVISOR};
use crate::game::RoundResults;
use crate::store::{DocKey, DocumentStore, TxnSnapshot, TxnWrite};
use crate::supply::{env_number, WordSupplyClient};

use super::model::{MasterDeck, UserDeck};
use super::{DeckError, DeckEvent, RefreshError};

/// Deck cache configuration.
#[derive(Debug, Clone)]
pub struct DeckConfig {
    /// Background refresh fires when fewer than `total / divisor` words remain.
    pub low_watermark_divisor: usize,
    /// Capacity of the event broadcast channel.
    pub event_capacity: usize,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            low_watermark_divisor: DEFAULT_LOW_WATERMARK_DIVISOR,
            event_capacity: 64,
        }
    }
}

impl DeckConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            low_watermark_divisor: env_number("HEADSUP_LOW_WATERMARK_DIVISOR")
                .unwrap_or(defaults.low_watermark_divisor),
            ..defaults
        }
    }
}

pub(super) struct Inner {
    pub(super) store: Arc<dyn DocumentStore>,
    pub(super) supply: WordSupplyClient,
    pub(super) config: DeckConfig,
    event_tx: broadcast::Sender<DeckEvent>,
}

/// Deck Cache Manager. Clones share the same store, supply and event channel.
#[derive(Clone)]
pub struct DeckCacheManager {
    pub(super) inner: Arc<Inner>,
}

impl DeckCacheManager {
    /// Create a manager over an explicitly constructed store and supply client.
    pub fn new(store: Arc<dyn DocumentStore>, supply: WordSupplyClient, config: DeckConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                store,
                supply,
                config,
                event_tx,
            }),
        }
    }

    /// Subscribe to deck events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<DeckEvent> {
        self.inner.event_tx.subscribe()
    }

    pub(super) fn emit(&self, event: DeckEvent) {
        // No subscribers is fine.
        let _ = self.inner.event_tx.send(event);
    }

    /// Unseen words for this user's deck, seeding or refilling as needed.
    ///
    /// Never returns an empty list. When the deck is below its low watermark
    /// the current words are returned right away and a refill is spawned.
    pub async fn get_deck(
        &self,
        user_id: &UserId,
        category: &str,
        difficulty: Difficulty,
    ) -> Result<Vec<String>, DeckError> {
        let deck_id = DeckId::new(category, difficulty);
        let user_key = DocKey::user_deck(user_id, &deck_id);
        info!("Getting deck {} for user {}", deck_id, user_id);

        let stored = self.inner.store.read(&user_key).await?;
        let user_deck = match UserDeck::from_document(stored.as_ref())? {
            Some(deck) => deck,
            None => {
                info!("No private deck for {}, seeding", deck_id);
                self.seed(user_id, category, difficulty)
                    .await
                    .map_err(|e| DeckError::unavailable(&deck_id, e))?
            }
        };

        let mut available = user_deck.available();
        info!(
            "Deck status: {} total, {} seen, {} available",
            user_deck.all_words.len(),
            user_deck.seen_words.len(),
            available.len()
        );

        if available.is_empty() {
            info!("Deck {} empty, refreshing", deck_id);
            let refreshed = self
                .refresh(user_id, category, difficulty)
                .await
                .map_err(|e| DeckError::unavailable(&deck_id, e))?;
            available = refreshed.available();
            if available.is_empty() {
                warn!("Deck {} still empty after refresh", deck_id);
                return Err(DeckError::DeckUnavailable { deck_id, source: None });
            }
        } else if needs_background_refresh(
            available.len(),
            user_deck.all_words.len(),
            self.inner.config.low_watermark_divisor,
        ) {
            info!("Deck {} low ({} left), refreshing in background", deck_id, available.len());
            self.trigger_background_refresh(user_id, category, difficulty);
        }

        Ok(available)
    }

    /// Spawn a detached refresh and return immediately.
    ///
    /// The outcome is only logged and broadcast as an event; failures are
    /// not retried.
    pub fn trigger_background_refresh(&self, user_id: &UserId, category: &str, difficulty: Difficulty) {
        let deck_id = DeckId::new(category, difficulty);
        self.emit(DeckEvent::BackgroundRefreshScheduled {
            deck_id: deck_id.clone(),
            user_id: user_id.clone(),
        });

        let manager = self.clone();
        let user_id = user_id.clone();
        let category = category.to_string();
        tokio::spawn(async move {
            match manager.refresh(&user_id, &category, difficulty).await {
                Ok(deck) => {
                    debug!("Background refresh of {} done", deck_id);
                    manager.emit(DeckEvent::BackgroundRefreshFinished {
                        deck_id,
                        user_id,
                        total_words: deck.all_words.len(),
                    });
                }
                Err(e) => {
                    error!("Background refresh of {} failed: {}", deck_id, e);
                    manager.emit(DeckEvent::BackgroundRefreshFailed {
                        deck_id,
                        user_id,
                        reason: e.to_string(),
                    });
                }
            }
        });
    }

    /// Record that the user played `word`. Failures are logged, never returned.
    pub async fn mark_seen(&self, user_id: &UserId, category: &str, difficulty: Difficulty, word: &str) {
        self.mark_seen_many(user_id, category, difficulty, [word]).await;
    }

    /// Record several played words in one write. Failures are logged, never
    /// returned.
    pub async fn mark_seen_many<I, S>(&self, user_id: &UserId, category: &str, difficulty: Difficulty, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
        if words.is_empty() {
            return;
        }

        let deck_id = DeckId::new(category, difficulty);
        let user_key = DocKey::user_deck(user_id, &deck_id);
        let missing = AtomicBool::new(false);

        let result = self
            .inner
            .store
            .transaction(&[user_key.clone()], &|snapshot: &TxnSnapshot| {
                let Some(mut deck) = UserDeck::from_document(snapshot.get(&user_key))? else {
                    missing.store(true, Ordering::Relaxed);
                    return Ok(Vec::new());
                };
                missing.store(false, Ordering::Relaxed);
                let mut changed = false;
                for word in &words {
                    changed |= deck.mark_seen(word);
                }
                if !changed {
                    return Ok(Vec::new());
                }
                Ok(vec![TxnWrite::new(user_key.clone(), deck.to_document()?)])
            })
            .await;

        match result {
            Ok(_) if missing.load(Ordering::Relaxed) => {
                warn!("Cannot mark words seen: no deck {} for user {}", deck_id, user_id);
            }
            Ok(commit) if commit.is_empty() => {
                debug!("Words already marked seen in {}", deck_id);
            }
            Ok(_) => {
                debug!("Marked {} words seen in {}", words.len(), deck_id);
            }
            Err(e) => {
                error!("Failed to update seen words for {}: {}", deck_id, e);
            }
        }
    }

    /// Mark every word played in a round as seen.
    pub async fn record_round(
        &self,
        user_id: &UserId,
        category: &str,
        difficulty: Difficulty,
        results: &RoundResults,
    ) {
        self.mark_seen_many(user_id, category, difficulty, results.played_words())
            .await;
    }

    /// Create the user's deck from the master deck, filling the master first
    /// if it is empty.
    async fn seed(
        &self,
        user_id: &UserId,
        category: &str,
        difficulty: Difficulty,
    ) -> Result<UserDeck, RefreshError> {
        let deck_id = DeckId::new(category, difficulty);
        let master_key = DocKey::master_deck(&deck_id);
        let user_key = DocKey::user_deck(user_id, &deck_id);

        let stored = self.inner.store.read(&master_key).await?;
        let master = MasterDeck::from_document(stored.as_ref())?.filter(|m| !m.is_empty());

        let deck = match master {
            Some(master) => {
                let deck = UserDeck::seeded_from(&master);
                self.inner.store.write(&user_key, deck.to_document()?).await?;
                deck
            }
            None => {
                info!("Master deck {} empty, calling word supply", deck_id);
                self.refresh(user_id, category, difficulty).await?
            }
        };

        info!("Seeded {} for user {} with {} words", deck_id, user_id, deck.all_words.len());
        self.emit(DeckEvent::Seeded {
            deck_id,
            user_id: user_id.clone(),
            total_words: deck.all_words.len(),
        });
        Ok(deck)
    }
}

/// Wait up to `grace` for every background refresh announced on `events` to
/// report back.
///
/// Only refreshes scheduled after `events` subscribed are tracked. Returns
/// false if one was still running when the grace period ran out; that task
/// keeps running detached and is dropped when the runtime shuts down.
pub async fn wait_for_background_refreshes(events: &mut broadcast::Receiver<DeckEvent>, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    let mut pending = 0usize;
    loop {
        let event = if pending == 0 {
            match events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("Missed {} deck events", missed);
                    continue;
                }
                Err(_) => return true,
            }
        } else {
            match tokio::time::timeout_at(deadline, events.recv()).await {
                Ok(Ok(event)) => event,
                Ok(Err(RecvError::Lagged(missed))) => {
                    warn!("Missed {} deck events", missed);
                    continue;
                }
                Ok(Err(RecvError::Closed)) => return true,
                Err(_) => return false,
            }
        };

        match event {
            DeckEvent::BackgroundRefreshScheduled { .. } => pending += 1,
            DeckEvent::BackgroundRefreshFinished { .. } | DeckEvent::BackgroundRefreshFailed { .. } => {
                pending = pending.saturating_sub(1)
            }
            _ => {}
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Outcome, Round};
    use crate::store::{Document, MemoryStore};
    use crate::supply::SupplyConfig;
    use crate::test_support::{numbered, FlakyStore, ScriptedSupply};
    use std::collections::BTreeSet;

    const CATEGORY: &str = "Movies";
    const DIFFICULTY: Difficulty = Difficulty::Easy;

    fn manager(store: Arc<dyn DocumentStore>, supply: Arc<ScriptedSupply>) -> DeckCacheManager {
        let client = WordSupplyClient::new(supply, SupplyConfig::default());
        DeckCacheManager::new(store, client, DeckConfig::default())
    }

    fn deck_id() -> DeckId {
        DeckId::new(CATEGORY, DIFFICULTY)
    }

    fn user() -> UserId {
        UserId::new("player-1")
    }

    async fn put_user_deck(store: &dyn DocumentStore, all: &[String], seen: &[String]) {
        let deck = UserDeck {
            all_words: all.to_vec(),
            seen_words: seen.iter().cloned().collect(),
            updated_at: None,
        };
        store
            .write(&DocKey::user_deck(&user(), &deck_id()), deck.to_document().unwrap())
            .await
            .unwrap();
    }

    async fn put_master_deck(store: &dyn DocumentStore, all: &[String]) {
        let mut master = MasterDeck::default();
        master.merge(all);
        store
            .write(&DocKey::master_deck(&deck_id()), master.to_document().unwrap())
            .await
            .unwrap();
    }

    async fn stored_user_deck(store: &dyn DocumentStore) -> Option<UserDeck> {
        let doc: Option<Document> = store.read(&DocKey::user_deck(&user(), &deck_id())).await.unwrap();
        UserDeck::from_document(doc.as_ref()).unwrap()
    }

    async fn next_event(rx: &mut broadcast::Receiver<DeckEvent>) -> DeckEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event in time")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_new_user_empty_master_seeds_from_supply() {
        let store = Arc::new(MemoryStore::new());
        let supply = Arc::new(ScriptedSupply::new(vec![
            Ok(numbered("a", 50)),
            Ok(numbered("b", 50)),
            Ok(numbered("c", 50)),
        ]));
        let manager = manager(store.clone(), supply);
        let mut events = manager.subscribe_events();

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words.len(), 150);

        let stored = stored_user_deck(&*store).await.unwrap();
        assert_eq!(stored.all_words.len(), 150);
        assert!(stored.seen_words.is_empty());

        let master_doc = store.read(&DocKey::master_deck(&deck_id())).await.unwrap();
        let master = MasterDeck::from_document(master_doc.as_ref()).unwrap().unwrap();
        assert_eq!(master.all_words.len(), 150);

        assert!(matches!(next_event(&mut events).await, DeckEvent::Refreshed { new_words: 150, .. }));
        assert!(matches!(next_event(&mut events).await, DeckEvent::Seeded { total_words: 150, .. }));
    }

    #[tokio::test]
    async fn test_new_user_copies_existing_master() {
        let store = Arc::new(MemoryStore::new());
        put_master_deck(&*store, &numbered("m", 30)).await;
        let supply = Arc::new(ScriptedSupply::always_failing());
        let manager = manager(store.clone(), supply.clone());

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words.len(), 30);
        assert!(supply.requests().is_empty());
        assert_eq!(stored_user_deck(&*store).await.unwrap().all_words.len(), 30);
    }

    #[tokio::test]
    async fn test_exhausted_deck_refreshes_synchronously() {
        let store = Arc::new(MemoryStore::new());
        let old = numbered("old", 20);
        put_master_deck(&*store, &old).await;
        put_user_deck(&*store, &old, &old).await;
        let supply = Arc::new(ScriptedSupply::new(vec![Ok(numbered("new", 30))]));
        let manager = manager(store.clone(), supply);

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words.len(), 50);

        let stored = stored_user_deck(&*store).await.unwrap();
        assert_eq!(stored.all_words.len(), 50);
        assert!(stored.seen_words.is_empty());
        assert_eq!(&stored.all_words[..20], &old[..]);
    }

    #[tokio::test]
    async fn test_exhausted_deck_with_dead_supply_is_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let old = numbered("old", 5);
        put_user_deck(&*store, &old, &old).await;
        let manager = manager(store, Arc::new(ScriptedSupply::always_failing()));

        let err = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap_err();
        assert!(matches!(err, DeckError::DeckUnavailable { source: None, .. }));
    }

    #[tokio::test]
    async fn test_first_seed_during_outage_is_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let manager = manager(store.clone(), Arc::new(ScriptedSupply::always_failing()));

        let err = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap_err();
        assert!(matches!(
            err,
            DeckError::DeckUnavailable {
                source: Some(RefreshError::SupplyExhausted { .. }),
                ..
            }
        ));
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn test_never_returns_seen_words() {
        let store = Arc::new(MemoryStore::new());
        let all = numbered("w", 12);
        put_user_deck(&*store, &all, &all[..4]).await;
        let manager = manager(store, Arc::new(ScriptedSupply::always_failing()));

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words, all[4..].to_vec());

        manager.mark_seen(&user(), CATEGORY, DIFFICULTY, &all[4]).await;
        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert!(!words.contains(&all[4]));
        assert_eq!(words.len(), 7);
    }

    #[tokio::test]
    async fn test_low_watermark_schedules_background_refresh() {
        let store = Arc::new(MemoryStore::new());
        let all = numbered("w", 100);
        put_master_deck(&*store, &all).await;
        put_user_deck(&*store, &all, &all[..91]).await;
        let supply = Arc::new(ScriptedSupply::new(vec![Ok(numbered("fresh", 40))]));
        let manager = manager(store.clone(), supply);
        let mut events = manager.subscribe_events();

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words, all[91..].to_vec());
        assert!(matches!(
            events.try_recv(),
            Ok(DeckEvent::BackgroundRefreshScheduled { .. })
        ));

        loop {
            match next_event(&mut events).await {
                DeckEvent::BackgroundRefreshFinished { total_words, .. } => {
                    assert_eq!(total_words, 140);
                    break;
                }
                DeckEvent::BackgroundRefreshFailed { reason, .. } => panic!("refresh failed: {reason}"),
                _ => {}
            }
        }

        let stored = stored_user_deck(&*store).await.unwrap();
        assert_eq!(stored.all_words.len(), 140);
        assert!(stored.seen_words.is_empty());
    }

    #[tokio::test]
    async fn test_at_watermark_no_refresh() {
        let store = Arc::new(MemoryStore::new());
        let all = numbered("w", 100);
        put_user_deck(&*store, &all, &all[..90]).await;
        let supply = Arc::new(ScriptedSupply::always_failing());
        let manager = manager(store, supply.clone());
        let mut events = manager.subscribe_events();

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words.len(), 10);
        assert!(events.try_recv().is_err());
        tokio::task::yield_now().await;
        assert!(supply.requests().is_empty());
    }

    #[tokio::test]
    async fn test_background_failure_is_invisible_to_caller() {
        let store = Arc::new(FlakyStore::default());
        let all = numbered("w", 100);
        put_user_deck(&store.inner, &all, &all[..95]).await;
        store.fail_writes.store(true, Ordering::SeqCst);
        let supply = Arc::new(ScriptedSupply::new(vec![Ok(numbered("fresh", 10))]));
        let manager = manager(store, supply);
        let mut events = manager.subscribe_events();

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words.len(), 5);

        loop {
            match next_event(&mut events).await {
                DeckEvent::BackgroundRefreshFailed { reason, .. } => {
                    assert!(reason.contains("writes disabled"));
                    break;
                }
                DeckEvent::BackgroundRefreshFinished { .. } => panic!("refresh should fail"),
                _ => {}
            }
        }
    }

    #[tokio::test]
    async fn test_mark_seen_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let all = numbered("w", 3);
        put_user_deck(&*store, &all, &[]).await;
        let manager = manager(store.clone(), Arc::new(ScriptedSupply::always_failing()));

        manager.mark_seen(&user(), CATEGORY, DIFFICULTY, &all[0]).await;
        manager.mark_seen(&user(), CATEGORY, DIFFICULTY, &all[0]).await;

        let stored = stored_user_deck(&*store).await.unwrap();
        assert_eq!(stored.seen_words.len(), 1);
        assert_eq!(stored.available(), all[1..].to_vec());
    }

    #[tokio::test]
    async fn test_mark_seen_without_deck_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let manager = manager(store.clone(), Arc::new(ScriptedSupply::always_failing()));

        manager.mark_seen(&user(), CATEGORY, DIFFICULTY, "Jaws").await;
        assert_eq!(store.document_count().await, 0);
    }

    #[tokio::test]
    async fn test_mark_seen_swallows_store_errors() {
        let store = Arc::new(FlakyStore::failing());
        let manager = manager(store, Arc::new(ScriptedSupply::always_failing()));

        // Must not panic or surface anything.
        manager.mark_seen(&user(), CATEGORY, DIFFICULTY, "Jaws").await;
    }

    #[tokio::test]
    async fn test_record_round_marks_played_words() {
        let store = Arc::new(MemoryStore::new());
        let all = numbered("w", 5);
        put_user_deck(&*store, &all, &[]).await;
        let manager = manager(store.clone(), Arc::new(ScriptedSupply::always_failing()));

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        let mut round = Round::new(words);
        round.record(Outcome::Correct);
        round.record(Outcome::Skip);
        let results = round.finish();

        manager.record_round(&user(), CATEGORY, DIFFICULTY, &results).await;

        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert_eq!(words, all[2..].to_vec());
    }

    #[tokio::test]
    async fn test_foreground_refresh_races_background_refresh() {
        let store = Arc::new(MemoryStore::new());
        let all = numbered("w", 5);
        put_master_deck(&*store, &all).await;
        put_user_deck(&*store, &all, &all).await;
        let supply = Arc::new(ScriptedSupply::new(vec![
            Ok(vec!["a".into(), "b".into()]),
            Ok(vec!["c".into()]),
            Ok(vec!["b".into(), "d".into()]),
            Ok(vec!["c".into(), "e".into()]),
            Ok(vec!["f".into()]),
            Ok(vec!["a".into(), "g".into()]),
        ]));
        let manager = manager(store.clone(), supply);
        let mut events = manager.subscribe_events();

        manager.trigger_background_refresh(&user(), CATEGORY, DIFFICULTY);
        let words = manager.get_deck(&user(), CATEGORY, DIFFICULTY).await.unwrap();
        assert!(!words.is_empty());
        assert!(wait_for_background_refreshes(&mut events, Duration::from_secs(5)).await);

        let stored = stored_user_deck(&*store).await.unwrap();
        let unique: BTreeSet<&String> = stored.all_words.iter().collect();
        assert_eq!(unique.len(), stored.all_words.len());
        assert_eq!(stored.all_words[..5], all[..]);
        for word in ["a", "b", "c", "d", "e", "f", "g"] {
            assert!(stored.all_words.iter().any(|w| w == word), "missing {word}");
        }
        assert_eq!(stored.all_words.len(), 12);
        assert!(stored.seen_words.is_empty());

        let master_doc = store.read(&DocKey::master_deck(&deck_id())).await.unwrap();
        let master = MasterDeck::from_document(master_doc.as_ref()).unwrap().unwrap();
        assert!(stored.all_words.iter().all(|w| master.all_words.contains(w)));
    }

    #[tokio::test]
    async fn test_wait_for_background_refreshes_without_any_scheduled() {
        let store = Arc::new(MemoryStore::new());
        let manager = manager(store, Arc::new(ScriptedSupply::always_failing()));
        let mut events = manager.subscribe_events();

        assert!(wait_for_background_refreshes(&mut events, Duration::ZERO).await);
    }

    #[tokio::test]
    async fn test_wait_for_background_refreshes_sees_completion() {
        let store = Arc::new(MemoryStore::new());
        let all = numbered("w", 20);
        put_user_deck(&*store, &all, &all[..19]).await;
        let supply = Arc::new(ScriptedSupply::new(vec![Ok(numbered("fresh", 10))]));
        let manager = manager(store.clone(), supply);
        let mut events = manager.subscribe_events();

        manager.trigger_background_refresh(&user(), CATEGORY, DIFFICULTY);
        assert!(wait_for_background_refreshes(&mut events, Duration::from_secs(5)).await);

        let stored = stored_user_deck(&*store).await.unwrap();
        assert_eq!(stored.all_words.len(), 30);
    }

    #[tokio::test]
    async fn test_wait_for_background_refreshes_gives_up_after_grace() {
        let store = Arc::new(MemoryStore::new());
        let manager = manager(store, Arc::new(ScriptedSupply::always_failing()));
        let mut events = manager.subscribe_events();

        // Announced but never reported back.
        manager.emit(DeckEvent::BackgroundRefreshScheduled {
            deck_id: deck_id(),
            user_id: user(),
        });
        assert!(!wait_for_background_refreshes(&mut events, Duration::from_millis(20)).await);
    }

    #[test]
    fn test_config_from_env_ignores_bad_divisor() {
        std::env::set_var("HEADSUP_LOW_WATERMARK_DIVISOR", "ten");
        assert_eq!(DeckConfig::from_env().low_watermark_divisor, DEFAULT_LOW_WATERMARK_DIVISOR);

        std::env::set_var("HEADSUP_LOW_WATERMARK_DIVISOR", "4");
        assert_eq!(DeckConfig::from_env().low_watermark_divisor, 4);
        std::env::remove_var("HEADSUP_LOW_WATERMARK_DIVISOR");
    }
}
