//! Substitution tables (emoji, teen-code)

use std::collections::HashMap;
use tracing::warn;

use crate::error::ResourceError;
use crate::text::Sanitizer;
use crate::utils::string_utils::{normalize_entry, token_count};

/// How the keys of a table are matched against text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Character-level scan; keys may sit directly next to other text (`😍😍ngon`)
    Glyph,
    /// Whole-token scan over whitespace tokens; keys never match inside a word
    Token,
}

impl MatchMode {
    /// Length of a key in the unit this mode scans with
    fn key_len(self, key: &str) -> usize {
        match self {
            MatchMode::Glyph => key.chars().count(),
            MatchMode::Token => token_count(key),
        }
    }
}

/// Immutable surface-form → replacement map
///
/// An empty replacement means "remove the surface form".
#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    name: String,
    mode: MatchMode,
    entries: HashMap<String, String>,
    /// Longest key, in chars (glyph mode) or tokens (token mode)
    max_key_len: usize,
}

impl SubstitutionTable {
    /// Build and validate a table from `(surface, replacement)` pairs
    ///
    /// Pairs are normalized the same way incoming text is, under default
    /// sanitize options. Line numbers in errors are the 1-based position of the
    /// pair.
    pub fn from_pairs<I, K, V>(name: &str, mode: MatchMode, pairs: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let sanitizer = Sanitizer::default();
        let mut table = Self::empty(name, mode);
        for (idx, (surface, replacement)) in pairs.into_iter().enumerate() {
            table.insert(idx + 1, surface.as_ref(), replacement.as_ref(), &sanitizer)?;
        }
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn empty(name: &str, mode: MatchMode) -> Self {
        Self {
            name: name.to_string(),
            mode,
            entries: HashMap::new(),
            max_key_len: 0,
        }
    }

    /// Add one entry, normalized the way text reaches this table
    ///
    /// Glyph tables run right after the clean phase, so their keys keep
    /// punctuation (`:))`). Token tables run after the punctuation policy, so
    /// keys and replacements go through it too (`k.o` becomes `k o`).
    pub(crate) fn insert(
        &mut self,
        line: usize,
        surface: &str,
        replacement: &str,
        sanitizer: &Sanitizer,
    ) -> Result<(), ResourceError> {
        let (key, value) = match self.mode {
            MatchMode::Glyph => (sanitizer.clean(surface), normalize_entry(replacement)),
            MatchMode::Token => (sanitizer.sanitize(surface), sanitizer.sanitize(replacement)),
        };
        if key.is_empty() {
            return Err(ResourceError::InvalidEntry {
                source_name: self.name.clone(),
                line,
                reason: "empty surface form after normalization".to_string(),
            });
        }

        self.max_key_len = self.max_key_len.max(self.mode.key_len(&key));
        if let Some(previous) = self.entries.insert(key.clone(), value) {
            warn!(
                "{}:{}: duplicate key {:?} overrides earlier replacement {:?}",
                self.name, line, key, previous
            );
        }
        Ok(())
    }

    /// Reject tables whose replacements could be matched again by the same table
    ///
    /// Glyph mode: no key may occur anywhere inside a replacement.
    /// Token mode: no contiguous token window of a replacement may equal a key.
    pub(crate) fn validate(&self) -> Result<(), ResourceError> {
        let mut surfaces: Vec<&String> = self.entries.keys().collect();
        surfaces.sort();

        for surface in surfaces {
            let replacement = &self.entries[surface];
            if replacement.is_empty() {
                continue;
            }
            if let Some(key) = self.reapplicable_key(replacement) {
                return Err(ResourceError::TableIntegrity {
                    source_name: self.name.clone(),
                    key,
                    surface: surface.clone(),
                    replacement: replacement.clone(),
                });
            }
        }
        Ok(())
    }

    fn reapplicable_key(&self, replacement: &str) -> Option<String> {
        match self.mode {
            MatchMode::Glyph => {
                let mut keys: Vec<&String> = self.entries.keys().collect();
                keys.sort();
                keys.into_iter()
                    .find(|key| replacement.contains(key.as_str()))
                    .cloned()
            }
            MatchMode::Token => {
                let tokens: Vec<&str> = replacement.split_whitespace().collect();
                for window in 1..=self.max_key_len.min(tokens.len()) {
                    for start in 0..=tokens.len() - window {
                        let candidate = tokens[start..start + window].join(" ");
                        if self.entries.contains_key(&candidate) {
                            return Some(candidate);
                        }
                    }
                }
                None
            }
        }
    }

    /// Replacement for an exact (already normalized) surface form
    pub fn get(&self, surface: &str) -> Option<&str> {
        self.entries.get(surface).map(String::as_str)
    }

    /// Table name used in logs and errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Match mode
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Longest key, in chars (glyph mode) or tokens (token mode)
    pub fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
