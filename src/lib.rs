//! # vireview - Vietnamese review text preprocessor
//!
//! Normalizes free-text Vietnamese customer reviews into the canonical token form a
//! sentiment classifier or a word-frequency counter expects.
//!
//! ## Pipeline
//!
//! - Sanitization: NFC, lowercase, URLs, control characters, repeated letters
//! - Emoji glyphs and emoticons → sentiment words
//! - Punctuation policy
//! - Teen-code / chat slang → standard Vietnamese
//! - Wrong-word removal
//! - Stopword removal, including multi-syllable compounds
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vireview::{Config, Preprocessor};
//!
//! let config = Config::load("resources/config.yaml")?;
//! let preprocessor = Preprocessor::from_config(&config)?;
//! let normalized = preprocessor.preprocess("Sp xài thích lắm 😍😍")?;
//! ```

// Require docs for public items
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod text;
pub mod utils;

// Re-exports for convenience
pub use config::{Config, EncodingPolicy, PreprocessOptions, PunctuationPolicy, ResourcePaths, SanitizeOptions};
pub use error::{PreprocessError, ResourceError};
pub use lexicon::{Lexicon, MatchMode, SubstitutionTable, TermKind, TermSet};
pub use pipeline::{preprocess, NormalizedText, PipelineTrace, Preprocessor, Stage};
pub use text::{filter_stopwords, filter_wrong, sanitize, substitute, tokenize};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
