//! Narration and input contracts, and spoken-word formatting.

mod sink;
mod words;

pub use sink::{LineReader, Narrator, ScriptedInput, Transcript};
pub use words::{count_word, digit_word, format_code};
