//! Where narration goes and where answers come from.

use std::collections::VecDeque;

/// Renders narration to the player.
///
/// Emission is synchronous: when `emit` returns, the text has been shown.
pub trait Narrator {
    /// Show one block of narration.
    fn emit(&mut self, text: &str);

    /// Show text exactly as given, bypassing any styling the narrator applies.
    ///
    /// Used for values the player has to type back, such as credential names.
    fn verbatim(&mut self, text: &str) {
        self.emit(text);
    }
}

/// Supplies lines typed by the player.
pub trait LineReader {
    /// Block for one line, without its trailing newline.
    ///
    /// Returns `None` once input is closed.
    fn read_line(&mut self) -> Option<String>;
}

/// A narrator that records everything it is given.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<String>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every emitted block, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All blocks joined with newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether any block contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Take the recorded blocks, leaving the transcript empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl Narrator for Transcript {
    fn emit(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// A line reader that replays prepared answers, then reports closed input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    reads: usize,
}

impl ScriptedInput {
    /// Create a reader that will answer with `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            reads: 0,
        }
    }

    /// Queue another answer.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    /// Number of `read_line` calls so far, including ones past the end.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl LineReader for ScriptedInput {
    fn read_line(&mut self) -> Option<String> {
        self.reads += 1;
        self.lines.pop_front()
    }
}
