//! Word Set Helpers
//!
//! Pure functions over word lists. No I/O.

use std::collections::BTreeSet;

/// Default divisor for the low-watermark threshold.
pub const DEFAULT_LOW_WATERMARK_DIVISOR: usize = 10;

/// Trim a candidate word. Returns `None` for blank input.
pub fn normalize_word(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Words in `all` that are not in `seen`, in `all` order.
pub fn available_words(all: &[String], seen: &BTreeSet<String>) -> Vec<String> {
    all.iter()
        .filter(|word| !seen.contains(*word))
        .cloned()
        .collect()
}

/// Low-watermark threshold for a deck of `total` words.
#[inline]
pub fn low_watermark(total: usize, divisor: usize) -> usize {
    if divisor == 0 {
        return 0;
    }
    total / divisor
}

/// True when a non-empty deck has dropped below its low watermark.
#[inline]
pub fn needs_background_refresh(available: usize, total: usize, divisor: usize) -> bool {
    available > 0 && available < low_watermark(total, divisor)
}
