//! Round Scoring
//!
//! A round walks the served words in order. Each card is either guessed
//! (`Correct`) or passed (`Skip`); the round ends when the words run out or
//! the caller stops it.

use serde::{Deserialize, Serialize};

/// Points for a correct guess.
pub const CORRECT_POINTS: i32 = 2;

/// Points for a skip.
pub const SKIP_PENALTY: i32 = -1;

/// How a card was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Guessed.
    Correct,
    /// Passed.
    Skip,
}

impl Outcome {
    /// Score delta for this outcome.
    pub fn points(self) -> i32 {
        match self {
            Outcome::Correct => CORRECT_POINTS,
            Outcome::Skip => SKIP_PENALTY,
        }
    }
}

/// Whether another card follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    /// `current_word` has the next card.
    Continue,
    /// No cards left.
    Finished,
}

/// Final tally of a round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResults {
    /// Net score, may be negative.
    pub score: i32,
    /// Guessed words, in play order.
    pub correct_words: Vec<String>,
    /// Passed words, in play order.
    pub skipped_words: Vec<String>,
}

impl RoundResults {
    /// Every word the player saw, correct first.
    pub fn played_words(&self) -> Vec<&str> {
        self.correct_words
            .iter()
            .chain(self.skipped_words.iter())
            .map(String::as_str)
            .collect()
    }
}

/// A round in progress.
#[derive(Clone, Debug)]
pub struct Round {
    words: Vec<String>,
    position: usize,
    results: RoundResults,
}

impl Round {
    /// Start a round over `words`, usually the output of `get_deck`.
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            position: 0,
            results: RoundResults::default(),
        }
    }

    /// Card on screen, `None` once the words are used up.
    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.position).map(String::as_str)
    }

    /// Running score.
    pub fn score(&self) -> i32 {
        self.results.score
    }

    /// Resolve the current card and advance.
    ///
    /// Recording after the round has finished is a no-op.
    pub fn record(&mut self, outcome: Outcome) -> RoundStatus {
        let Some(word) = self.words.get(self.position).cloned() else {
            return RoundStatus::Finished;
        };

        self.results.score += outcome.points();
        match outcome {
            Outcome::Correct => self.results.correct_words.push(word),
            Outcome::Skip => self.results.skipped_words.push(word),
        }
        self.position += 1;

        if self.position < self.words.len() {
            RoundStatus::Continue
        } else {
            RoundStatus::Finished
        }
    }

    /// End the round, e.g. when the timer runs out.
    pub fn finish(self) -> RoundResults {
        self.results
    }
}
