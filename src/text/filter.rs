//! Wrong-word and stopword filters

use crate::lexicon::TermSet;

/// Drop tokens listed in the wrong-word set
///
/// Single-token lookup. Order and multiplicity of the survivors are preserved.
pub fn filter_wrong(tokens: &[String], wrong: &TermSet) -> Vec<String> {
    tokens
        .iter()
        .filter(|token| !contains_folded(wrong, token))
        .cloned()
        .collect()
}

/// Drop stopwords, compound stopwords included
///
/// At each position the longest window (up to the longest stopword, in tokens)
/// is tried first; a match consumes the whole window, otherwise one token is
/// kept and the scan moves on by one.
pub fn filter_stopwords(tokens: &[String], stopwords: &TermSet) -> Vec<String> {
    let mut kept = Vec::with_capacity(tokens.len());
    let mut pos = 0;

    while pos < tokens.len() {
        let longest = stopwords.max_window().min(tokens.len() - pos);
        let matched = (1..=longest).rev().find(|&len| {
            if len == 1 {
                contains_folded(stopwords, &tokens[pos])
            } else {
                stopwords.contains_window(&tokens[pos..pos + len])
            }
        });

        match matched {
            Some(len) => pos += len,
            None => {
                kept.push(tokens[pos].clone());
                pos += 1;
            }
        }
    }
    kept
}

/// Set lookup that also tries the lowercase form of tokens that were not
/// lowercased by the sanitizer
fn contains_folded(set: &TermSet, token: &str) -> bool {
    set.contains(token) || (token.chars().any(char::is_uppercase) && set.contains(&token.to_lowercase()))
}
