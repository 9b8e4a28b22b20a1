//! Term sets (wrong words, stopwords)

use std::collections::HashSet;

use crate::error::ResourceError;
use crate::text::Sanitizer;
use crate::utils::string_utils::token_count;

/// Whether entries of a set may span several tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Single tokens only; looked up one token at a time (wrong words)
    Word,
    /// Phrases of one or more tokens (stopwords)
    Phrase,
}

/// Immutable set of normalized terms
///
/// Terms are normalized exactly like comment text reaching the filters (clean
/// phase, then punctuation policy), so `Rất   Hài Lòng`, `sản_phẩm` and `zzz`
/// are stored as `rất hài lòng`, `sản phẩm` and `z`. Phrase terms may span
/// several tokens; `max_window` is the longest term measured in tokens.
#[derive(Debug, Clone)]
pub struct TermSet {
    name: String,
    kind: TermKind,
    terms: HashSet<String>,
    max_window: usize,
}

impl TermSet {
    /// Build a phrase set from raw terms with default sanitize options
    pub fn from_terms<I, S>(name: &str, terms: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::collect(name, TermKind::Phrase, terms)
    }

    /// Build a single-token set from raw words with default sanitize options
    pub fn from_words<I, S>(name: &str, words: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::collect(name, TermKind::Word, words)
    }

    fn collect<I, S>(name: &str, kind: TermKind, terms: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sanitizer = Sanitizer::default();
        let mut set = Self::empty(name, kind);
        for (idx, term) in terms.into_iter().enumerate() {
            set.insert(idx + 1, term.as_ref(), &sanitizer)?;
        }
        Ok(set)
    }

    pub(crate) fn empty(name: &str, kind: TermKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            terms: HashSet::new(),
            max_window: 0,
        }
    }

    pub(crate) fn insert(
        &mut self,
        line: usize,
        term: &str,
        sanitizer: &Sanitizer,
    ) -> Result<(), ResourceError> {
        let term = sanitizer.sanitize(term);
        if term.is_empty() {
            return Err(self.invalid(line, "empty term after normalization".to_string()));
        }

        let tokens = token_count(&term);
        if self.kind == TermKind::Word && tokens > 1 {
            return Err(self.invalid(
                line,
                format!("{term:?} has {tokens} tokens, entries must be a single word"),
            ));
        }

        self.max_window = self.max_window.max(tokens);
        self.terms.insert(term);
        Ok(())
    }

    fn invalid(&self, line: usize, reason: String) -> ResourceError {
        ResourceError::InvalidEntry {
            source_name: self.name.clone(),
            line,
            reason,
        }
    }

    /// Whether a single normalized token or phrase is in the set
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    /// Whether the tokens of `window`, joined by single spaces, form a term
    pub fn contains_window(&self, window: &[String]) -> bool {
        match window {
            [] => false,
            [single] => self.terms.contains(single),
            _ => self.terms.contains(&window.join(" ")),
        }
    }

    /// Terms in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Set name used in logs and errors
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether entries are single words or phrases
    pub fn kind(&self) -> TermKind {
        self.kind
    }

    /// Longest term, in tokens
    pub fn max_window(&self) -> usize {
        self.max_window
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PunctuationPolicy, SanitizeOptions};

    #[test]
    fn test_terms_are_normalized() {
        let set = TermSet::from_terms("stop", ["Rất   Hài Lòng", "SẢN PHẨM", "và"]).unwrap();
        assert!(set.contains("rất hài lòng"));
        assert!(set.contains("sản phẩm"));
        assert!(set.contains("và"));
        assert_eq!(set.max_window(), 3);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_underscore_compounds_become_syllables() {
        let set = TermSet::from_terms("stop", ["sản_phẩm"]).unwrap();
        assert!(set.contains("sản phẩm"));
        assert_eq!(set.max_window(), 2);
    }

    #[test]
    fn test_repeated_letters_collapse_like_input() {
        let set = TermSet::from_words("wrong", ["zzz", "hmm"]).unwrap();
        assert!(set.contains("z"));
        assert!(!set.contains("zzz"));
        assert!(set.contains("hmm"));
    }

    #[test]
    fn test_punctuation_follows_policy() {
        let set = TermSet::from_terms("stop", ["v.v", "ạ!"]).unwrap();
        assert!(set.contains("v v"));
        assert!(set.contains("ạ"));

        let strip = Sanitizer::new(SanitizeOptions {
            punctuation: PunctuationPolicy::Strip,
            ..Default::default()
        });
        let mut set = TermSet::empty("stop", TermKind::Phrase);
        set.insert(1, "v.v", &strip).unwrap();
        assert!(set.contains("vv"));
    }

    #[test]
    fn test_contains_window() {
        let set = TermSet::from_terms("stop", ["sản phẩm"]).unwrap();
        let window = vec!["sản".to_string(), "phẩm".to_string()];
        assert!(set.contains_window(&window));
        assert!(!set.contains_window(&window[..1]));
        assert!(!set.contains_window(&[]));
    }

    #[test]
    fn test_empty_term_is_rejected() {
        let err = TermSet::from_terms("wrong", ["ok", "\u{FE0F}"]).unwrap_err();
        assert_eq!(err.line(), Some(2));

        let err = TermSet::from_terms("stop", ["và", "..."]).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_word_set_rejects_phrases() {
        let err = TermSet::from_words("wrong-word.txt", ["abc", "sản phẩm"]).unwrap_err();
        match err {
            ResourceError::InvalidEntry {
                source_name, line, ..
            } => {
                assert_eq!(source_name, "wrong-word.txt");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(TermSet::from_words("wrong", ["sản_phẩm"]).is_err());
    }
}
