//! Preprocessing pipeline
//!
//! Stage order:
//! 1. clean (NFC, lowercase, URLs, control chars, repeated letters)
//! 2. emoji glyphs → phrases
//! 3. punctuation policy
//! 4. teen-code → standard form
//! 5. tokenize, drop wrong words
//! 6. drop stopwords (compounds included), join
//!
//! Emoji run before punctuation handling so emoticons like `:))` still match, and
//! before the stopword filter so a phrase an emoji expands to can still be removed.

use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::trace::{PipelineTrace, Stage};
use crate::config::{Config, PreprocessOptions};
use crate::error::{PreprocessError, ResourceError};
use crate::lexicon::{Lexicon, SubstitutionTable, TermSet};
use crate::text::{
    decode_input, filter_stopwords, filter_wrong, split_lines, substitute, tokenize, Sanitizer,
};
use crate::utils::string_utils::join_tokens;

/// Pipeline output for one comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    /// Surviving tokens, in input order
    pub tokens: Vec<String>,
    /// Whether invalid UTF-8 in the input was replaced before processing
    pub lossy: bool,
}

impl NormalizedText {
    /// Tokens joined by single spaces
    pub fn as_text(&self) -> String {
        join_tokens(&self.tokens)
    }

    /// Whether every token was filtered out
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<NormalizedText> for String {
    fn from(text: NormalizedText) -> Self {
        text.as_text()
    }
}

/// Borrowed view of the four resources
#[derive(Clone, Copy)]
struct Resources<'a> {
    emoji: &'a SubstitutionTable,
    teencode: &'a SubstitutionTable,
    wrong_words: &'a TermSet,
    stopwords: &'a TermSet,
}

impl<'a> From<&'a Lexicon> for Resources<'a> {
    fn from(lexicon: &'a Lexicon) -> Self {
        Self {
            emoji: lexicon.emoji(),
            teencode: lexicon.teencode(),
            wrong_words: lexicon.wrong_words(),
            stopwords: lexicon.stopwords(),
        }
    }
}

fn check_length(raw: &str, max: usize) -> Result<(), PreprocessError> {
    // A string never has more chars than bytes
    if raw.len() <= max {
        return Ok(());
    }
    let chars = raw.chars().count();
    if chars > max {
        return Err(PreprocessError::InputTooLarge { chars, max });
    }
    Ok(())
}

fn note(trace: &mut Option<&mut PipelineTrace>, stage: Stage, text: &str) {
    if let Some(trace) = trace.as_deref_mut() {
        trace.record(stage, text);
    }
}

fn run_stages(
    raw: &str,
    sanitizer: &Sanitizer,
    max_input_chars: usize,
    resources: Resources<'_>,
    mut trace: Option<&mut PipelineTrace>,
) -> Result<Vec<String>, PreprocessError> {
    check_length(raw, max_input_chars)?;

    let text = sanitizer.clean(raw);
    note(&mut trace, Stage::Clean, &text);

    let text = substitute(&text, resources.emoji);
    note(&mut trace, Stage::Emoji, &text);

    let text = sanitizer.strip_punctuation(&text);
    note(&mut trace, Stage::Punctuation, &text);

    let text = substitute(&text, resources.teencode);
    note(&mut trace, Stage::Teencode, &text);

    let tokens = filter_wrong(&tokenize(&text), resources.wrong_words);
    if trace.is_some() {
        note(&mut trace, Stage::WrongWords, &join_tokens(&tokens));
    }

    let tokens = filter_stopwords(&tokens, resources.stopwords);
    if trace.is_some() {
        note(&mut trace, Stage::Stopwords, &join_tokens(&tokens));
    }

    Ok(tokens)
}

/// Normalize one comment with default options
///
/// Returns an empty string when every token is filtered out.
pub fn preprocess(
    raw: &str,
    emoji: &SubstitutionTable,
    teencode: &SubstitutionTable,
    wrong_words: &TermSet,
    stopwords: &TermSet,
) -> Result<String, PreprocessError> {
    let options = PreprocessOptions::default();
    let resources = Resources {
        emoji,
        teencode,
        wrong_words,
        stopwords,
    };
    let tokens = run_stages(
        raw,
        &Sanitizer::new(options.sanitize),
        options.max_input_chars,
        resources,
        None,
    )?;
    Ok(join_tokens(&tokens))
}

/// Preprocessing pipeline over a shared, fully loaded [`Lexicon`]
///
/// Cheap to clone and safe to use from many threads at once.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    lexicon: Arc<Lexicon>,
    options: PreprocessOptions,
    sanitizer: Sanitizer,
}

impl Preprocessor {
    /// Create a pipeline over an already loaded lexicon
    ///
    /// The lexicon should have been loaded with `options.sanitize`; entries
    /// normalized under other options may never match.
    pub fn new(lexicon: Arc<Lexicon>, options: PreprocessOptions) -> Self {
        if lexicon.sanitize_options() != &options.sanitize {
            warn!(
                "Lexicon was normalized with {:?} but the pipeline runs with {:?}",
                lexicon.sanitize_options(),
                options.sanitize
            );
        }
        let sanitizer = Sanitizer::new(options.sanitize.clone());
        Self {
            lexicon,
            options,
            sanitizer,
        }
    }

    /// Load the lexicon named by `config` and build a pipeline over it
    pub fn from_config(config: &Config) -> Result<Self, ResourceError> {
        let lexicon = Lexicon::load(&config.resources, &config.preprocess.sanitize)?;
        Ok(Self::new(Arc::new(lexicon), config.preprocess.clone()))
    }

    /// Normalize one comment to a string
    pub fn preprocess(&self, raw: &str) -> Result<String, PreprocessError> {
        self.normalize(raw).map(String::from)
    }

    /// Normalize one comment to its token sequence
    pub fn normalize(&self, raw: &str) -> Result<NormalizedText, PreprocessError> {
        let tokens = self.run(raw, None)?;
        Ok(NormalizedText {
            tokens,
            lossy: false,
        })
    }

    /// Decode and normalize one comment given as bytes
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<NormalizedText, PreprocessError> {
        let decoded = decode_input(bytes, self.options.encoding)?;
        let mut normalized = self.normalize(&decoded.text)?;
        normalized.lossy = decoded.lossy;
        Ok(normalized)
    }

    /// Normalize one comment, recording the text after every stage
    pub fn trace(&self, raw: &str) -> Result<PipelineTrace, PreprocessError> {
        let mut trace = PipelineTrace::new(raw);
        self.run(raw, Some(&mut trace))?;
        Ok(trace)
    }

    /// Normalize many comments in parallel
    ///
    /// Results line up with `items`; a failing item does not affect the others.
    pub fn preprocess_batch<S>(&self, items: &[S]) -> Vec<Result<String, PreprocessError>>
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<_> = items
            .par_iter()
            .map(|item| self.preprocess(item.as_ref()))
            .collect();
        debug!(
            "Batch of {} comments, {} failed",
            results.len(),
            results.iter().filter(|r| r.is_err()).count()
        );
        results
    }

    /// Normalize every line of a line-delimited upload
    ///
    /// Each line is decoded separately, so invalid bytes only fail their own line.
    pub fn preprocess_lines(&self, bytes: &[u8]) -> Vec<Result<NormalizedText, PreprocessError>> {
        split_lines(bytes)
            .par_iter()
            .map(|line| self.normalize_bytes(line))
            .collect()
    }

    /// Loaded resources
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Options in use
    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    fn run(&self, raw: &str, trace: Option<&mut PipelineTrace>) -> Result<Vec<String>, PreprocessError> {
        run_stages(
            raw,
            &self.sanitizer,
            self.options.max_input_chars,
            Resources::from(self.lexicon.as_ref()),
            trace,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodingPolicy;
    use crate::lexicon::MatchMode;

    fn lexicon() -> Lexicon {
        Lexicon::new(
            SubstitutionTable::from_pairs(
                "emoji",
                MatchMode::Glyph,
                [("😍", "thích"), ("👍", "tốt"), (":))", "vui"), ("xd", "cười")],
            )
            .unwrap(),
            SubstitutionTable::from_pairs(
                "teen",
                MatchMode::Token,
                [("ko", "không"), ("sp", "sản phẩm"), ("dc", "được"), ("k.o", "không")],
            )
            .unwrap(),
            TermSet::from_words("wrong", ["abc", "zzz"]).unwrap(),
            TermSet::from_terms("stop", ["thì", "sản phẩm", "rất hài lòng", "v.v"]).unwrap(),
        )
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::new(Arc::new(lexicon()), PreprocessOptions::default())
    }

    #[test]
    fn test_full_pipeline() {
        let out = preprocessor()
            .preprocess("SP này thì ĐẸPPPP lắm 😍, ko chê dc abc!!! https://hasaki.vn")
            .unwrap();
        assert_eq!(out, "này đẹp lắm thích không chê được");
    }

    #[test]
    fn test_free_function_matches_preprocessor() {
        let lex = lexicon();
        let raw = "Rất hài lòng 👍👍 sp tốt :))";
        let free = preprocess(
            raw,
            lex.emoji(),
            lex.teencode(),
            lex.wrong_words(),
            lex.stopwords(),
        )
        .unwrap();
        assert_eq!(free, preprocessor().preprocess(raw).unwrap());
        assert_eq!(free, "tốt tốt tốt vui");
    }

    #[test]
    fn test_stretched_noise_word_is_removed() {
        assert_eq!(preprocessor().preprocess("zzz chán").unwrap(), "chán");
        assert_eq!(preprocessor().preprocess("ZZZZZZ chán").unwrap(), "chán");
    }

    #[test]
    fn test_punctuated_entries_match() {
        assert_eq!(preprocessor().preprocess("k.o thích v.v").unwrap(), "không thích");
    }

    #[test]
    fn test_alphabetic_emoticon_only_matches_whole() {
        assert_eq!(preprocessor().preprocess("xdd hộp").unwrap(), "xdd hộp");
        assert_eq!(preprocessor().preprocess("vui xd").unwrap(), "vui cười");
    }

    #[test]
    fn test_everything_filtered_is_empty_not_error() {
        let out = preprocessor().normalize("Thì sản phẩm... abc").unwrap();
        assert!(out.is_empty());
        assert_eq!(out.as_text(), "");
    }

    #[test]
    fn test_input_too_large() {
        let options = PreprocessOptions {
            max_input_chars: 5,
            ..Default::default()
        };
        let p = Preprocessor::new(Arc::new(lexicon()), options);

        // 5 chars but 10 bytes
        assert!(p.preprocess("đđđđđ").is_ok());
        assert_eq!(
            p.preprocess("tốt quá"),
            Err(PreprocessError::InputTooLarge { chars: 7, max: 5 })
        );
    }

    #[test]
    fn test_normalize_bytes_reject() {
        let err = preprocessor().normalize_bytes(b"t\xfft").unwrap_err();
        assert_eq!(err, PreprocessError::Encoding { valid_up_to: 1 });
    }

    #[test]
    fn test_normalize_bytes_replace_is_flagged() {
        let options = PreprocessOptions {
            encoding: EncodingPolicy::Replace,
            ..Default::default()
        };
        let p = Preprocessor::new(Arc::new(lexicon()), options);
        let out = p.normalize_bytes(b"ngon\xff qu\xc3\xa1").unwrap();
        assert!(out.lossy);
        assert_eq!(out.as_text(), "ngon quá");
    }

    #[test]
    fn test_trace_records_every_stage() {
        let trace = preprocessor().trace("Sp 😍 thì ok").unwrap();
        let stages: Vec<Stage> = trace.stages.iter().map(|s| s.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
        assert_eq!(trace.get(Stage::Emoji), Some("sp thích thì ok"));
        assert_eq!(trace.get(Stage::Teencode), Some("sản phẩm thích thì ok"));
        assert_eq!(trace.output(), "thích ok");
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let options = PreprocessOptions {
            max_input_chars: 20,
            ..Default::default()
        };
        let p = Preprocessor::new(Arc::new(lexicon()), options);
        let items = vec!["ko đẹp".to_string(), "x".repeat(50), "sp 👍".to_string()];

        let results = p.preprocess_batch(&items);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_deref(), Ok("không đẹp"));
        assert!(matches!(results[1], Err(PreprocessError::InputTooLarge { .. })));
        assert_eq!(results[2].as_deref(), Ok("tốt"));
    }

    #[test]
    fn test_preprocess_lines() {
        let mut upload = b"ko dc\n\xff\n\n".to_vec();
        upload.extend_from_slice("sp 😍\n".as_bytes());

        let results = preprocessor().preprocess_lines(&upload);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().as_text(), "không được");
        assert!(matches!(results[1], Err(PreprocessError::Encoding { .. })));
        assert!(results[2].as_ref().unwrap().is_empty());
        assert_eq!(results[3].as_ref().unwrap().as_text(), "thích");
    }
}
