//! Preprocessor configuration
//!
//! Loaded from YAML. Every field has a default, so an empty file is a valid config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default maximum comment length, in characters
pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lexical resource locations
    pub resources: ResourcePaths,
    /// Pipeline options
    pub preprocess: PreprocessOptions,
}

impl Config {
    /// Load config from a YAML file
    ///
    /// Relative resource paths are resolved against the config file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;

        let base_dir = path.parent().unwrap_or(Path::new("."));
        config.resources = config.resources.resolve_against(base_dir);
        Ok(config)
    }
}

/// Paths of the four lexical resource files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePaths {
    /// Emoji glyph → phrase table (two TAB-separated fields per line)
    pub emoji: PathBuf,
    /// Teen-code token → phrase table (two TAB-separated fields per line)
    pub teencode: PathBuf,
    /// Wrong-word list (one term per line)
    pub wrong_words: PathBuf,
    /// Stopword list (one term per line, compounds allowed)
    pub stopwords: PathBuf,
}

impl Default for ResourcePaths {
    fn default() -> Self {
        Self {
            emoji: PathBuf::from("emojicon.txt"),
            teencode: PathBuf::from("teencode.txt"),
            wrong_words: PathBuf::from("wrong-word.txt"),
            stopwords: PathBuf::from("vietnamese-stopwords.txt"),
        }
    }
}

impl ResourcePaths {
    /// Resolve relative paths against `base_dir`
    pub fn resolve_against(self, base_dir: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base_dir.join(p) };
        Self {
            emoji: resolve(self.emoji),
            teencode: resolve(self.teencode),
            wrong_words: resolve(self.wrong_words),
            stopwords: resolve(self.stopwords),
        }
    }
}

/// Options applied to every preprocessing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Inputs longer than this (in chars) fail with `InputTooLarge`
    pub max_input_chars: usize,
    /// What to do with bytes that are not valid UTF-8
    pub encoding: EncodingPolicy,
    /// Sanitizer behavior
    pub sanitize: SanitizeOptions,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            encoding: EncodingPolicy::default(),
            sanitize: SanitizeOptions::default(),
        }
    }
}

/// Sanitizer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeOptions {
    /// Punctuation handling
    pub punctuation: PunctuationPolicy,
    /// Remove `http(s)://` and `www.` links
    pub strip_urls: bool,
    /// Collapse runs of 3+ identical letters to one (`ngonnnn` → `ngon`)
    pub collapse_repeats: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            punctuation: PunctuationPolicy::Space,
            strip_urls: true,
            collapse_repeats: true,
        }
    }
}

/// Punctuation handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunctuationPolicy {
    /// Replace each punctuation/symbol char with a space
    #[default]
    Space,
    /// Delete punctuation/symbol chars, joining their neighbours
    Strip,
}

/// Handling of input bytes that are not valid UTF-8
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingPolicy {
    /// Fail the item with `PreprocessError::Encoding`
    #[default]
    Reject,
    /// Substitute U+FFFD and mark the result as lossy
    Replace,
}
