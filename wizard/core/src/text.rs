//! Text Post-Processing
//!
//! Generated copy is shaped for display before it lands in the draft: titles
//! and descriptions are capped to a word budget, and fixed fallback literals
//! stand in when the service produces nothing usable.
//!
//! The service is asked for at most 6 title words, but the display budget is
//! 5. The two limits are deliberately different.

/// Title used when the title call yields no usable text
pub const DEFAULT_TITLE: &str = "Default Title";

/// Description used when the description call yields no usable text
pub const DEFAULT_DESCRIPTION: &str = "Default Description";

/// Call to action used when the CTA call yields no usable text
pub const DEFAULT_CTA: &str = "Click Here";

/// Display budget for titles (words)
pub const TITLE_WORD_LIMIT: usize = 5;

/// Display budget for descriptions (words)
pub const DESCRIPTION_WORD_LIMIT: usize = 20;

/// Keep the first `max_words` whitespace-separated words, joined by single spaces.
///
/// Idempotent, and `limit_words("", n)` is always `""`.
#[must_use]
pub fn limit_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed text, or `None` if nothing printable is left
#[must_use]
pub fn usable_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Number of whitespace-separated words
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
