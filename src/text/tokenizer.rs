//! Syllable tokenization
//!
//! Vietnamese writes one syllable per whitespace-separated unit; compound words
//! (`sản phẩm`) span several tokens and are recognized by window matching in the
//! filters rather than by the tokenizer.

/// Split sanitized text into syllable tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
