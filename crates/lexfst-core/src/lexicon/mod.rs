//! Lexicon entries and their compilation into a trie-shaped transducer.
//!
//! A lexicon maps each word to the input-symbol sequence that spells it.
//! [`LexiconCompiler`] appends disambiguation markers where sequences
//! collide (see [`add_disambig`]) and writes the result through any
//! [`FstWriter`](crate::fst::FstWriter) backend.

mod compiler;
mod disambig;
mod io;
#[cfg(test)]
mod tests;

pub use compiler::LexiconCompiler;
pub use disambig::add_disambig;
pub use io::{add_ilabel_selfloops, read_lexicon, read_lexicon_file, write_lexicon};

use std::fmt;
use std::str::FromStr;

use crate::fst::FstError;
use crate::symbol::Symbol;

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("entry {index}: empty word")]
    EmptyWord { index: usize },

    #[error("entry {index} ({word}): empty symbol sequence")]
    EmptySymbols { index: usize, word: String },

    #[error("unexpected value for unknown symbol policy: {0}")]
    InvalidPolicy(String),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fst(#[from] FstError),
}

/// One `(word, symbols, weight)` row. `weight` is a negative log
/// probability; lower is better.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    pub word: String,
    pub symbols: Vec<Symbol>,
    pub weight: f32,
}

impl LexiconEntry {
    pub fn new(word: impl Into<String>, symbols: Vec<Symbol>, weight: f32) -> Self {
        Self {
            word: word.into(),
            symbols,
            weight,
        }
    }

    /// Entry whose symbols are the given encoded labels.
    pub fn from_labels(word: impl Into<String>, labels: &[&str], weight: f32) -> Result<Self, LexiconError> {
        let symbols = labels
            .iter()
            .map(|l| Symbol::from_encoded(l).map_err(FstError::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(word, symbols, weight))
    }
}

/// What the compiled FST does with input symbols absent from the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPolicy {
    /// Emit the captured input symbol.
    Output,
    /// Consume the input symbol and emit nothing.
    Ignore,
    /// No unknown arc; decoding dead-ends.
    #[default]
    Fail,
}

impl FromStr for UnknownPolicy {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "output" => Ok(UnknownPolicy::Output),
            "ignore" => Ok(UnknownPolicy::Ignore),
            "fail" => Ok(UnknownPolicy::Fail),
            other => Err(LexiconError::InvalidPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnknownPolicy::Output => "output",
            UnknownPolicy::Ignore => "ignore",
            UnknownPolicy::Fail => "fail",
        })
    }
}
