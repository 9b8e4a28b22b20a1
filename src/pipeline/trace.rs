//! Stage-by-stage snapshots of one preprocessing run
//!
//! Useful when a dictionary entry interacts badly with a later stage, e.g. an
//! emoji phrase that is immediately removed again as a stopword.

use std::fmt;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// NFC, lowercase, URLs, control characters, repeated letters
    Clean,
    /// Emoji glyphs → phrases
    Emoji,
    /// Punctuation policy
    Punctuation,
    /// Teen-code → standard form
    Teencode,
    /// Wrong-word removal
    WrongWords,
    /// Stopword removal
    Stopwords,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 6] = [
        Stage::Clean,
        Stage::Emoji,
        Stage::Punctuation,
        Stage::Teencode,
        Stage::WrongWords,
        Stage::Stopwords,
    ];

    /// Short stage name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::Emoji => "emoji",
            Stage::Punctuation => "punctuation",
            Stage::Teencode => "teencode",
            Stage::WrongWords => "wrong-words",
            Stage::Stopwords => "stopwords",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text after one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSnapshot {
    /// Stage that produced `text`
    pub stage: Stage,
    /// Text (or space-joined tokens) after the stage
    pub text: String,
}

/// Recorded run of the pipeline over one comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineTrace {
    /// Raw input as given
    pub input: String,
    /// Snapshots in execution order
    pub stages: Vec<StageSnapshot>,
}

impl PipelineTrace {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            stages: Vec::with_capacity(Stage::ALL.len()),
        }
    }

    pub(crate) fn record(&mut self, stage: Stage, text: &str) {
        self.stages.push(StageSnapshot {
            stage,
            text: text.to_string(),
        });
    }

    /// Text after `stage`
    pub fn get(&self, stage: Stage) -> Option<&str> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.text.as_str())
    }

    /// Final normalized text
    pub fn output(&self) -> &str {
        self.stages.last().map(|s| s.text.as_str()).unwrap_or("")
    }

    /// Stages that changed the text
    pub fn changed_stages(&self) -> Vec<Stage> {
        let mut previous = self.input.as_str();
        let mut changed = Vec::new();
        for snapshot in &self.stages {
            if snapshot.text != previous {
                changed.push(snapshot.stage);
            }
            previous = &snapshot.text;
        }
        changed
    }

    /// One line per stage, `*` marking stages that changed the text
    pub fn summary(&self) -> String {
        let changed = self.changed_stages();
        let mut lines = vec![format!("  {:<12} | {}", "input", self.input)];
        for snapshot in &self.stages {
            let marker = if changed.contains(&snapshot.stage) { '*' } else { ' ' };
            lines.push(format!("{} {:<12} | {}", marker, snapshot.stage.name(), snapshot.text));
        }
        lines.join("\n")
    }
}
