//! Error types for resource loading and preprocessing
//!
//! Load-time failures ([`ResourceError`]) are fatal to pipeline construction.
//! Per-call failures ([`PreprocessError`]) only affect the comment that caused them.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a lexical resource
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Resource file could not be read
    #[error("failed to read resource {path:?}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A line does not have the expected number of fields
    #[error("{source_name}:{line}: expected {expected} field(s), found {found}")]
    Format {
        /// Resource name, usually the file name
        source_name: String,
        /// 1-based physical line
        line: usize,
        /// Fields the resource kind requires
        expected: usize,
        /// Fields actually present
        found: usize,
    },

    /// A line has the right shape but an entry that can never match
    #[error("{source_name}:{line}: {reason}")]
    InvalidEntry {
        /// Resource name, usually the file name
        source_name: String,
        /// 1-based physical line
        line: usize,
        /// What is wrong with the entry
        reason: String,
    },

    /// A replacement phrase would be matched again by the same table
    #[error(
        "{source_name}: replacement {replacement:?} for {surface:?} contains key {key:?}"
    )]
    TableIntegrity {
        /// Resource name, usually the file name
        source_name: String,
        /// Key found inside the replacement
        key: String,
        /// Entry whose replacement contains `key`
        surface: String,
        /// The offending replacement
        replacement: String,
    },
}

impl ResourceError {
    /// Line number of the offending entry, when the error points at one
    pub fn line(&self) -> Option<usize> {
        match self {
            ResourceError::Format { line, .. } | ResourceError::InvalidEntry { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}

/// Errors raised while preprocessing a single comment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    /// Input bytes are not valid UTF-8
    #[error("input is not valid UTF-8 (valid up to byte {valid_up_to})")]
    Encoding {
        /// Length of the valid UTF-8 prefix, in bytes
        valid_up_to: usize,
    },

    /// Input exceeds the configured maximum length
    #[error("input has {chars} characters, maximum is {max}")]
    InputTooLarge {
        /// Characters in the input
        chars: usize,
        /// Configured maximum
        max: usize,
    },
}
