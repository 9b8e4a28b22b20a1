//! Dictionary substitution (emoji, teen-code)
//!
//! Longest match wins at every position. Replacements are always separated from
//! their neighbours by a space, so two adjacent replacements never merge.
//!
//! Glyph keys may touch surrounding text (`😍😍ngon`), except that a key edge
//! that is a letter or digit must sit on a word boundary: `xd` matches in
//! `vui xd` and `hay:xd` but not in `xdd`.

use crate::lexicon::{MatchMode, SubstitutionTable};

/// Rewrite `text` with `table`
///
/// Unmatched text passes through. Token tables work on whitespace tokens and
/// return them joined by single spaces.
pub fn substitute(text: &str, table: &SubstitutionTable) -> String {
    if table.is_empty() || text.is_empty() {
        return text.to_string();
    }
    match table.mode() {
        MatchMode::Glyph => substitute_glyphs(text, table),
        MatchMode::Token => substitute_tokens(text, table),
    }
}

fn substitute_glyphs(text: &str, table: &SubstitutionTable) -> String {
    // Byte offset of every char boundary, end of text included
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    let mut out = String::with_capacity(text.len() + 16);
    let mut after_replacement = false;
    let mut pos = 0;

    while pos < char_count {
        let longest = table.max_key_len().min(char_count - pos);
        let matched = (1..=longest).rev().find_map(|len| {
            let (start, end) = (bounds[pos], bounds[pos + len]);
            let replacement = table.get(&text[start..end])?;
            on_word_boundary(text, start, end).then_some((len, replacement))
        });

        match matched {
            Some((len, replacement)) => {
                if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push_str(replacement);
                after_replacement = true;
                pos += len;
            }
            None => {
                let glyph = &text[bounds[pos]..bounds[pos + 1]];
                if after_replacement
                    && !glyph.starts_with(char::is_whitespace)
                    && !out.is_empty()
                    && !out.ends_with(char::is_whitespace)
                {
                    out.push(' ');
                }
                after_replacement = false;
                out.push_str(glyph);
                pos += 1;
            }
        }
    }
    out
}

/// Whether `text[start..end]` does not cut through a word at an alphanumeric edge
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let key = &text[start..end];
    let alnum = |c: Option<char>| c.is_some_and(char::is_alphanumeric);

    let open_left = alnum(key.chars().next()) && alnum(text[..start].chars().next_back());
    let open_right = alnum(key.chars().next_back()) && alnum(text[end..].chars().next());
    !open_left && !open_right
}

fn substitute_tokens(text: &str, table: &SubstitutionTable) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<&str> = Vec::with_capacity(tokens.len());
    let mut pos = 0;

    while pos < tokens.len() {
        let longest = table.max_key_len().min(tokens.len() - pos);
        let matched = (1..=longest).rev().find_map(|len| {
            let replacement = if len == 1 {
                table.get(tokens[pos])
            } else {
                table.get(&tokens[pos..pos + len].join(" "))
            };
            replacement.map(|r| (len, r))
        });

        match matched {
            Some((len, replacement)) => {
                if !replacement.is_empty() {
                    out.push(replacement);
                }
                pos += len;
            }
            None => {
                out.push(tokens[pos]);
                pos += 1;
            }
        }
    }
    out.join(" ")
}
