//! Text processing stages
//!
//! - Sanitization (case, URLs, repeats, punctuation) and input decoding
//! - Dictionary substitution (emoji, teen-code)
//! - Syllable tokenization and line segmentation
//! - Wrong-word and stopword filtering

mod filter;
mod sanitizer;
mod segmenter;
mod substitute;
mod tokenizer;

pub use filter::{filter_stopwords, filter_wrong};
pub use sanitizer::{decode_input, sanitize, DecodedInput, Sanitizer};
pub use segmenter::split_lines;
pub use substitute::substitute;
pub use tokenizer::tokenize;
