//! Heads Up Deck Cache
//!
//! Plays one round against the deck cache: fetch a deck, score a simulated
//! round and report the played words back.
//!
//! Usage: `headsup-decks [CATEGORY] [DIFFICULTY]`

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use headsup_decks::{
    DeckCacheManager, DeckConfig, DeckEvent, Difficulty, DocumentStore, HttpWordSupply, MemoryStore,
    Outcome, Round, RoundStatus, SupplyConfig, UserId, WordSupplyClient, CATEGORIES, VERSION,
    wait_for_background_refreshes,
};

/// Cards played in the demo round.
const DEMO_ROUND_CARDS: usize = 8;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;

    info!("Heads Up Deck Cache v{}", VERSION);

    let mut args = std::env::args().skip(1);
    let category = args.next().unwrap_or_else(|| CATEGORIES[0].to_string());
    let difficulty: Difficulty = match args.next() {
        Some(raw) => raw.parse()?,
        None => Difficulty::default(),
    };
    if !CATEGORIES.contains(&category.as_str()) {
        warn!("Unknown category {:?}, generating anyway", category);
    }

    let store: Arc<dyn DocumentStore> = match std::env::var("HEADSUP_STORE_PATH") {
        Ok(path) => {
            info!("Store file: {}", path);
            Arc::new(MemoryStore::open(&path).await?)
        }
        Err(_) => Arc::new(MemoryStore::new()),
    };

    let supply_config = SupplyConfig::from_env();
    info!("Word supply: {}", supply_config.endpoint);
    let supply = Arc::new(HttpWordSupply::new(&supply_config)?);
    // Long enough for every batch of one refresh to time out
    let shutdown_grace = supply_config
        .request_timeout
        .saturating_mul(u32::try_from(supply_config.batch_count).unwrap_or(u32::MAX));
    let manager = DeckCacheManager::new(
        store,
        WordSupplyClient::new(supply, supply_config),
        DeckConfig::from_env(),
    );

    let user_id = std::env::var("HEADSUP_USER_ID")
        .map(UserId::new)
        .unwrap_or_else(|_| UserId::anonymous());
    info!("User: {}", user_id);

    let mut background = manager.subscribe_events();
    let mut events = manager.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let DeckEvent::BackgroundRefreshFailed { reason, .. } = &event {
                warn!("Background refresh failed: {}", reason);
            } else {
                info!("Deck event: {:?}", event);
            }
        }
    });

    let words = manager
        .get_deck(&user_id, &category, difficulty)
        .await
        .with_context(|| format!("No playable deck for {} {}", category, difficulty))?;
    info!("Serving {} unseen words", words.len());

    // Simulated round: alternate guesses and skips
    let mut round = Round::new(words.into_iter().take(DEMO_ROUND_CARDS).collect());
    let mut turn = 0;
    while let Some(word) = round.current_word() {
        let outcome = if turn % 2 == 0 { Outcome::Correct } else { Outcome::Skip };
        info!("{:>2}. {:<24} {:?}", turn + 1, word, outcome);
        turn += 1;
        if round.record(outcome) == RoundStatus::Finished {
            break;
        }
    }

    let results = round.finish();
    info!("=== Round Results ===");
    info!("Score: {}", results.score);
    info!("Correct: {}", results.correct_words.join(", "));
    info!("Skipped: {}", results.skipped_words.join(", "));

    manager.record_round(&user_id, &category, difficulty, &results).await;

    if !wait_for_background_refreshes(&mut background, shutdown_grace).await {
        warn!("Background refresh still running after {:?}, dropping it", shutdown_grace);
    }
    Ok(())
}
