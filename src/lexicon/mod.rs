//! Lexical resources
//!
//! - Substitution tables (emoji glyphs, teen-code)
//! - Term sets (wrong words, stopwords)
//! - Flat-file loading with line-accurate errors
//!
//! Everything here is immutable once loaded and can be shared across threads.

mod loader;
mod table;
mod term_set;

pub use loader::{load_table, load_term_set, parse_table, parse_term_set};
pub use table::{MatchMode, SubstitutionTable};
pub use term_set::{TermKind, TermSet};

use tracing::{info, warn};

use crate::config::{ResourcePaths, SanitizeOptions};
use crate::error::ResourceError;
use crate::text::Sanitizer;

/// The four resources the pipeline runs with
#[derive(Debug, Clone)]
pub struct Lexicon {
    emoji: SubstitutionTable,
    teencode: SubstitutionTable,
    wrong_words: TermSet,
    stopwords: TermSet,
    sanitize: SanitizeOptions,
}

/// Entry counts for one loaded resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceStats {
    /// Resource file name
    pub name: String,
    /// Number of distinct entries
    pub entries: usize,
    /// Longest entry: chars for glyph tables, tokens otherwise
    pub longest: usize,
}

impl Lexicon {
    /// Bundle resources built with default sanitize options
    /// ([`SubstitutionTable::from_pairs`], [`TermSet::from_terms`])
    pub fn new(
        emoji: SubstitutionTable,
        teencode: SubstitutionTable,
        wrong_words: TermSet,
        stopwords: TermSet,
    ) -> Self {
        Self::assemble(emoji, teencode, wrong_words, stopwords, SanitizeOptions::default())
    }

    /// Load all four resources; any failure aborts the whole load
    ///
    /// Entries are normalized with `sanitize`, which must match the options the
    /// pipeline runs with.
    pub fn load(paths: &ResourcePaths, sanitize: &SanitizeOptions) -> Result<Self, ResourceError> {
        let sanitizer = Sanitizer::new(sanitize.clone());
        let lexicon = Self::assemble(
            load_table(&paths.emoji, MatchMode::Glyph, &sanitizer)?,
            load_table(&paths.teencode, MatchMode::Token, &sanitizer)?,
            load_term_set(&paths.wrong_words, TermKind::Word, &sanitizer)?,
            load_term_set(&paths.stopwords, TermKind::Phrase, &sanitizer)?,
            sanitize.clone(),
        );
        info!(
            "Lexicon ready: {} emoji, {} teen-code, {} wrong words, {} stopwords",
            lexicon.emoji.len(),
            lexicon.teencode.len(),
            lexicon.wrong_words.len(),
            lexicon.stopwords.len()
        );
        Ok(lexicon)
    }

    fn assemble(
        emoji: SubstitutionTable,
        teencode: SubstitutionTable,
        wrong_words: TermSet,
        stopwords: TermSet,
        sanitize: SanitizeOptions,
    ) -> Self {
        // Teen-code runs first, so a wrong word that is also a key never reaches the filter
        let mut shadowed: Vec<&str> = wrong_words
            .iter()
            .filter(|word| teencode.get(word).is_some())
            .collect();
        shadowed.sort_unstable();
        for word in shadowed {
            warn!(
                "{}: {:?} is rewritten by {} before wrong-word filtering",
                wrong_words.name(),
                word,
                teencode.name()
            );
        }

        Self {
            emoji,
            teencode,
            wrong_words,
            stopwords,
            sanitize,
        }
    }

    /// Emoji glyph → phrase table
    pub fn emoji(&self) -> &SubstitutionTable {
        &self.emoji
    }

    /// Teen-code token → phrase table
    pub fn teencode(&self) -> &SubstitutionTable {
        &self.teencode
    }

    /// Known misspellings and noise words
    pub fn wrong_words(&self) -> &TermSet {
        &self.wrong_words
    }

    /// Stopwords, compounds included
    pub fn stopwords(&self) -> &TermSet {
        &self.stopwords
    }

    /// Sanitize options the entries were normalized with
    pub fn sanitize_options(&self) -> &SanitizeOptions {
        &self.sanitize
    }

    /// Per-resource entry counts, in pipeline order
    pub fn stats(&self) -> Vec<ResourceStats> {
        let table = |t: &SubstitutionTable| ResourceStats {
            name: t.name().to_string(),
            entries: t.len(),
            longest: t.max_key_len(),
        };
        let set = |s: &TermSet| ResourceStats {
            name: s.name().to_string(),
            entries: s.len(),
            longest: s.max_window(),
        };
        vec![
            table(&self.emoji),
            table(&self.teencode),
            set(&self.wrong_words),
            set(&self.stopwords),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PunctuationPolicy;
    use std::path::Path;

    fn write_resources(dir: &Path, teencode: &str) -> ResourcePaths {
        std::fs::write(dir.join("emojicon.txt"), "😍\tthích\n").unwrap();
        std::fs::write(dir.join("teencode.txt"), teencode).unwrap();
        std::fs::write(dir.join("wrong-word.txt"), "abc\n").unwrap();
        std::fs::write(dir.join("vietnamese-stopwords.txt"), "và\nsản phẩm\nv.v\n").unwrap();
        ResourcePaths::default().resolve_against(dir)
    }

    #[test]
    fn test_load_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_resources(dir.path(), "ko\tkhông\nj z\tgì vậy\n");

        let lexicon = Lexicon::load(&paths, &SanitizeOptions::default()).unwrap();
        let stats = lexicon.stats();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].name, "emojicon.txt");
        assert_eq!(stats[1].entries, 2);
        assert_eq!(stats[1].longest, 2);
        assert_eq!(stats[3].longest, 2);
        assert_eq!(lexicon.wrong_words().kind(), TermKind::Word);
        assert_eq!(lexicon.stopwords().kind(), TermKind::Phrase);
    }

    #[test]
    fn test_load_uses_given_punctuation_policy() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_resources(dir.path(), "k.o\tkhông\n");
        let options = SanitizeOptions {
            punctuation: PunctuationPolicy::Strip,
            ..Default::default()
        };

        let lexicon = Lexicon::load(&paths, &options).unwrap();
        assert_eq!(lexicon.teencode().get("ko"), Some("không"));
        assert!(lexicon.stopwords().contains("vv"));
        assert_eq!(lexicon.sanitize_options(), &options);
    }

    #[test]
    fn test_load_fails_on_any_bad_resource() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_resources(dir.path(), "ko\tkhông\nbroken line\n");

        let err = Lexicon::load(&paths, &SanitizeOptions::default()).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_new_uses_default_options() {
        let lexicon = Lexicon::new(
            SubstitutionTable::from_pairs("emoji", MatchMode::Glyph, [("😍", "thích")]).unwrap(),
            SubstitutionTable::from_pairs("teen", MatchMode::Token, [("z", "vậy")]).unwrap(),
            TermSet::from_words("wrong", ["zzz"]).unwrap(),
            TermSet::from_terms("stop", ["và"]).unwrap(),
        );
        assert_eq!(lexicon.sanitize_options(), &SanitizeOptions::default());
        assert!(lexicon.wrong_words().contains("z"));
    }
}
