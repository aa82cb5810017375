//! Game Module
//!
//! One round of Heads Up: step through a served deck, score each card and
//! hand the played words back to the deck cache.
//!
//! ## Module Structure
//!
//! - `round`: round state, scoring and results

pub mod round;

pub use round::{Outcome, Round, RoundResults, RoundStatus, CORRECT_POINTS, SKIP_PENALTY};
