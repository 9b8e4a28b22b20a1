//! Utility functions shared by the lexicon loader and the text stages
//!
//! Resource entries and incoming comments must go through the same surface
//! normalization, otherwise dictionary lookups silently miss.

/// String utilities
pub mod string_utils {
    use unicode_normalization::UnicodeNormalization;

    /// Emoji presentation selector, dropped so `❤️` and `❤` look the same
    pub const VARIATION_SELECTOR_16: char = '\u{FE0F}';

    /// Collapse every whitespace run to a single space and trim both ends
    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Canonical surface form: NFC, lowercase, no variation selector
    ///
    /// NFC runs before lowercasing so decomposed Vietnamese input
    /// (`e` + U+0302 + U+0301) compares equal to the precomposed `ế`.
    pub fn normalize_surface(text: &str) -> String {
        let composed: String = text
            .nfc()
            .filter(|&c| c != VARIATION_SELECTOR_16)
            .collect();
        composed.to_lowercase()
    }

    /// Normalize a dictionary entry: surface normalization plus whitespace collapse
    pub fn normalize_entry(text: &str) -> String {
        collapse_whitespace(&normalize_surface(text))
    }

    /// Number of whitespace-separated tokens in a phrase
    pub fn token_count(phrase: &str) -> usize {
        phrase.split_whitespace().count()
    }

    /// Join tokens with a single space
    pub fn join_tokens(tokens: &[String]) -> String {
        tokens.join(" ")
    }
}
