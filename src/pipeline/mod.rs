//! Preprocessing pipeline
//!
//! - `Preprocessor`: shared-lexicon pipeline with single, batch and line-upload entry points
//! - `preprocess`: the same pipeline as a plain function over four resources
//! - `PipelineTrace`: per-stage snapshots for debugging dictionary interactions

mod preprocessor;
mod trace;

pub use preprocessor::{preprocess, NormalizedText, Preprocessor};
pub use trace::{PipelineTrace, Stage, StageSnapshot};
