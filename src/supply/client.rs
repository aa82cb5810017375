//! Batched Word Fetching
//!
//! Runs the sequential batch loop used by a deck refresh: each batch sees the
//! exclusion set grown by the previous batches, and a failed batch never stops
//! the batches after it.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::core::{normalize_word, Difficulty};
use super::{GenerateRequest, SupplyConfig, SupplyError, WordSupply};

/// Word Supply Client: a [`WordSupply`] plus batching policy.
#[derive(Clone)]
pub struct WordSupplyClient {
    supply: Arc<dyn WordSupply>,
    config: SupplyConfig,
}

impl WordSupplyClient {
    /// Wrap a word source.
    pub fn new(supply: Arc<dyn WordSupply>, config: SupplyConfig) -> Self {
        Self { supply, config }
    }

    /// Batching configuration in use.
    pub fn config(&self) -> &SupplyConfig {
        &self.config
    }

    /// Single exchange with the word source.
    pub async fn generate_batch(
        &self,
        category: &str,
        difficulty: Difficulty,
        count: usize,
        exclusions: &BTreeSet<String>,
    ) -> Result<Vec<String>, SupplyError> {
        let request = GenerateRequest {
            category: category.to_string(),
            difficulty: difficulty.as_str().to_string(),
            count,
            existing_words: exclusions.iter().cloned().collect(),
        };
        self.supply.generate_batch(&request).await
    }

    /// Fetch words not in `exclusions`, in acceptance order.
    ///
    /// Accepted words are added to `exclusions`. Batch failures are logged
    /// and skipped; an empty result means every batch failed or returned
    /// nothing new.
    pub async fn fetch_new_words(
        &self,
        category: &str,
        difficulty: Difficulty,
        exclusions: &mut BTreeSet<String>,
    ) -> Vec<String> {
        let mut accepted = Vec::new();

        for batch in 1..=self.config.batch_count {
            let candidates = match self
                .generate_batch(category, difficulty, self.config.batch_size, exclusions)
                .await
            {
                Ok(words) => words,
                Err(e) => {
                    error!("Batch {} failed: {}", batch, e);
                    continue;
                }
            };

            let before = accepted.len();
            for word in candidates.iter().filter_map(|w| normalize_word(w)) {
                if exclusions.insert(word.clone()) {
                    accepted.push(word);
                }
            }
            debug!(
                "Batch {}: {} candidates, {} new",
                batch,
                candidates.len(),
                accepted.len() - before
            );
        }

        info!("Fetched {} new unique words for {} ({})", accepted.len(), category, difficulty);
        accepted
    }
}
