//! Input sanitization
//!
//! Two phases, run on either side of emoji translation:
//! - `clean`: NFC, lowercase, URLs, control characters, repeated letters, whitespace
//! - `strip_punctuation`: punctuation/symbol policy, whitespace
//!
//! Emoticon keys such as `:)` or `<3` need their punctuation, so the pipeline
//! translates emoji between the two phases.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::warn;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{EncodingPolicy, PunctuationPolicy, SanitizeOptions};
use crate::error::PreprocessError;
use crate::utils::string_utils::{collapse_whitespace, normalize_surface};

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

/// Shortest run of one letter that gets collapsed (`ngonnn` → `ngon`)
const MIN_REPEAT_RUN: usize = 3;

/// Syllable joiner used by word-segmented Vietnamese text (`sản_phẩm`)
const SYLLABLE_JOINER: char = '_';

/// Decoded comment text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInput<'a> {
    /// UTF-8 text
    pub text: Cow<'a, str>,
    /// Whether invalid bytes were replaced with U+FFFD
    pub lossy: bool,
}

/// Decode raw bytes according to `policy`
pub fn decode_input(bytes: &[u8], policy: EncodingPolicy) -> Result<DecodedInput<'_>, PreprocessError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(DecodedInput {
            text: Cow::Borrowed(text),
            lossy: false,
        }),
        Err(e) => match policy {
            EncodingPolicy::Reject => Err(PreprocessError::Encoding {
                valid_up_to: e.valid_up_to(),
            }),
            EncodingPolicy::Replace => {
                warn!(
                    "Replacing invalid UTF-8 after byte {} with U+FFFD",
                    e.valid_up_to()
                );
                Ok(DecodedInput {
                    text: String::from_utf8_lossy(bytes),
                    lossy: true,
                })
            }
        },
    }
}

/// Stage 1 of the pipeline
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    options: SanitizeOptions,
}

impl Sanitizer {
    /// Create a sanitizer with the given options
    pub fn new(options: SanitizeOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &SanitizeOptions {
        &self.options
    }

    /// Phase one: everything except punctuation handling
    pub fn clean(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let mut text = normalize_surface(raw);

        if self.options.strip_urls {
            text = URL_REGEX.replace_all(&text, " ").into_owned();
        }

        let text: String = text
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();

        let text = if self.options.collapse_repeats {
            collapse_repeats(&text)
        } else {
            text
        };

        collapse_whitespace(&text)
    }

    /// Phase two: apply the punctuation policy
    ///
    /// Letters, digits, combining marks and whitespace survive. The syllable
    /// joiner `_` always becomes a space so `sản_phẩm` splits into syllables.
    pub fn strip_punctuation(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_alphanumeric() || c.is_whitespace() || is_combining_mark(c) {
                out.push(c);
            } else if c == SYLLABLE_JOINER || self.options.punctuation == PunctuationPolicy::Space {
                out.push(' ');
            }
        }
        collapse_whitespace(&out)
    }

    /// Both phases back to back
    pub fn sanitize(&self, raw: &str) -> String {
        self.strip_punctuation(&self.clean(raw))
    }
}

/// Sanitize with the given options (both phases)
pub fn sanitize(raw: &str, options: &SanitizeOptions) -> String {
    Sanitizer::new(options.clone()).sanitize(raw)
}

/// Collapse runs of `MIN_REPEAT_RUN`+ identical alphabetic graphemes to one
fn collapse_repeats(text: &str) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < graphemes.len() {
        let grapheme = graphemes[i];
        let mut end = i + 1;
        while end < graphemes.len() && graphemes[end] == grapheme {
            end += 1;
        }

        let alphabetic = grapheme.chars().next().is_some_and(char::is_alphabetic);
        let keep = if alphabetic && end - i >= MIN_REPEAT_RUN { 1 } else { end - i };
        for _ in 0..keep {
            out.push_str(grapheme);
        }
        i = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> Sanitizer {
        Sanitizer::default()
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(sanitizer().sanitize(""), "");
        assert_eq!(sanitizer().sanitize(" \t\n "), "");
    }

    #[test]
    fn test_lowercase_keeps_diacritics() {
        assert_eq!(sanitizer().sanitize("SẢN PHẨM TỐT"), "sản phẩm tốt");
        assert_eq!(sanitizer().sanitize("Đẹp Ơi"), "đẹp ơi");
    }

    #[test]
    fn test_decomposed_input_matches_precomposed() {
        let decomposed = "to\u{302}\u{301}t";
        assert_eq!(sanitizer().sanitize(decomposed), "tốt");
    }

    #[test]
    fn test_urls_are_removed() {
        let out = sanitizer().sanitize("xem https://hasaki.vn/sp?id=1 và www.abc.com nhé");
        assert_eq!(out, "xem và nhé");
    }

    #[test]
    fn test_urls_kept_when_disabled() {
        let options = SanitizeOptions {
            strip_urls: false,
            ..Default::default()
        };
        let out = Sanitizer::new(options).clean("xem www.abc.com");
        assert_eq!(out, "xem www.abc.com");
    }

    #[test]
    fn test_control_chars_become_spaces() {
        assert_eq!(sanitizer().clean("tốt\u{0}quá\r\nđẹp"), "tốt quá đẹp");
    }

    #[test]
    fn test_repeated_letters_collapse() {
        assert_eq!(sanitizer().clean("ngonnnnn quááá"), "ngon quá");
        assert_eq!(sanitizer().clean("xoong"), "xoong");
        assert_eq!(sanitizer().clean("1000"), "1000");
    }

    #[test]
    fn test_repeats_kept_when_disabled() {
        let options = SanitizeOptions {
            collapse_repeats: false,
            ..Default::default()
        };
        assert_eq!(Sanitizer::new(options).clean("ngonnn"), "ngonnn");
    }

    #[test]
    fn test_clean_keeps_punctuation() {
        assert_eq!(sanitizer().clean("Tốt :)) <3"), "tốt :)) <3");
    }

    #[test]
    fn test_punctuation_space_policy() {
        assert_eq!(sanitizer().sanitize("tốt,đẹp!!! rẻ..."), "tốt đẹp rẻ");
    }

    #[test]
    fn test_punctuation_strip_policy() {
        let options = SanitizeOptions {
            punctuation: PunctuationPolicy::Strip,
            ..Default::default()
        };
        assert_eq!(sanitize("tốt,đẹp! rẻ", &options), "tốtđẹp rẻ");
    }

    #[test]
    fn test_syllable_joiner_always_splits() {
        let options = SanitizeOptions {
            punctuation: PunctuationPolicy::Strip,
            ..Default::default()
        };
        assert_eq!(sanitize("sản_phẩm tốt", &options), "sản phẩm tốt");
    }

    #[test]
    fn test_leftover_emoji_is_removed() {
        assert_eq!(sanitizer().sanitize("tốt 🤖"), "tốt");
    }

    #[test]
    fn test_decode_valid() {
        let decoded = decode_input("tốt".as_bytes(), EncodingPolicy::Reject).unwrap();
        assert_eq!(decoded.text, "tốt");
        assert!(!decoded.lossy);
    }

    #[test]
    fn test_decode_invalid_rejected() {
        let bytes = [b'o', b'k', 0xff, b'x'];
        let err = decode_input(&bytes, EncodingPolicy::Reject).unwrap_err();
        assert_eq!(err, PreprocessError::Encoding { valid_up_to: 2 });
    }

    #[test]
    fn test_decode_invalid_replaced() {
        let bytes = [b'o', b'k', 0xff];
        let decoded = decode_input(&bytes, EncodingPolicy::Replace).unwrap();
        assert_eq!(decoded.text, "ok\u{FFFD}");
        assert!(decoded.lossy);
    }
}
