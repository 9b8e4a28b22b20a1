//! Flat-file parsing for lexical resources
//!
//! Tables: one `surface<TAB>replacement` entry per line.
//! Term lists: one term per line.
//! Empty and whitespace-only lines are not entries and are skipped.
//!
//! Entries go through the same [`Sanitizer`] as comment text, so an entry that
//! loads is an entry that can match.

use std::path::Path;
use tracing::debug;

use super::{MatchMode, SubstitutionTable, TermKind, TermSet};
use crate::error::ResourceError;
use crate::text::Sanitizer;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Numbered, non-blank lines of a resource file (BOM stripped)
fn entry_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .trim_start_matches(BYTE_ORDER_MARK)
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Parse a two-field substitution table
pub fn parse_table(
    source_name: &str,
    content: &str,
    mode: MatchMode,
    sanitizer: &Sanitizer,
) -> Result<SubstitutionTable, ResourceError> {
    let mut table = SubstitutionTable::empty(source_name, mode);

    for (line_no, line) in entry_lines(content) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 2 {
            return Err(ResourceError::Format {
                source_name: source_name.to_string(),
                line: line_no,
                expected: 2,
                found: fields.len(),
            });
        }
        table.insert(line_no, fields[0], fields[1], sanitizer)?;
    }

    table.validate()?;
    debug!(
        "Loaded table {} ({} entries, longest key {})",
        source_name,
        table.len(),
        table.max_key_len()
    );
    Ok(table)
}

/// Parse a single-field term list
pub fn parse_term_set(
    source_name: &str,
    content: &str,
    kind: TermKind,
    sanitizer: &Sanitizer,
) -> Result<TermSet, ResourceError> {
    let mut set = TermSet::empty(source_name, kind);

    for (line_no, line) in entry_lines(content) {
        let found = line.split('\t').count();
        if found != 1 {
            return Err(ResourceError::Format {
                source_name: source_name.to_string(),
                line: line_no,
                expected: 1,
                found,
            });
        }
        set.insert(line_no, line, sanitizer)?;
    }

    debug!(
        "Loaded term set {} ({} terms, longest {} tokens)",
        source_name,
        set.len(),
        set.max_window()
    );
    Ok(set)
}

fn read_resource(path: &Path) -> Result<String, ResourceError> {
    std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load a substitution table from a file
pub fn load_table<P: AsRef<Path>>(
    path: P,
    mode: MatchMode,
    sanitizer: &Sanitizer,
) -> Result<SubstitutionTable, ResourceError> {
    let path = path.as_ref();
    let content = read_resource(path)?;
    parse_table(&source_name(path), &content, mode, sanitizer)
}

/// Load a term list from a file
pub fn load_term_set<P: AsRef<Path>>(
    path: P,
    kind: TermKind,
    sanitizer: &Sanitizer,
) -> Result<TermSet, ResourceError> {
    let path = path.as_ref();
    let content = read_resource(path)?;
    parse_term_set(&source_name(path), &content, kind, sanitizer)
}
