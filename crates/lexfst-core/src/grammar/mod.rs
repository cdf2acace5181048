//! Grammar rule sets and their compilation into a transducer.
//!
//! A rule set maps class names to alternative rules. Each rule is a
//! sequence of [`RuleToken`]s with an optional `?`/`*` flag, the shape a BNF
//! front end produces after expanding parenthesised groups into auxiliary
//! classes. [`GrammarCompiler`] writes the result through any
//! [`FstWriter`](crate::fst::FstWriter) backend.

mod compiler;
#[cfg(test)]
mod tests;

pub use compiler::GrammarCompiler;

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::fst::FstError;

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("undefined class <{0}>")]
    UndefinedClass(String),

    #[error("reference cycle in grammar: {}", .0.join(" -> "))]
    ReferenceCycle(Vec<String>),

    #[error("class <{class}>: empty symbol")]
    EmptySymbol { class: String },

    #[error("class <{class}>: repeated rule may match without consuming input")]
    EmptyRepeat { class: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fst(#[from] FstError),
}

/// One element on the right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleToken {
    /// `"text"`: every character maps to itself.
    Symbol(String),
    /// `"text":_`: consume every character, emit nothing.
    Input(String),
    /// `_:"word"`: emit the whole word without consuming input.
    Output(String),
    /// `<name>`
    Class(String),
    /// `_`
    Epsilon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFlag {
    #[default]
    Once,
    /// `?`
    Optional,
    /// `*`, zero or more times.
    Repeat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub tokens: Vec<RuleToken>,
    #[serde(default)]
    pub flag: RuleFlag,
    /// Added once per use of this alternative.
    #[serde(default)]
    pub weight: f32,
}

impl Rule {
    pub fn new(tokens: Vec<RuleToken>) -> Self {
        Self {
            tokens,
            flag: RuleFlag::Once,
            weight: 0.0,
        }
    }

    pub fn optional(mut self) -> Self {
        self.flag = RuleFlag::Optional;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.flag = RuleFlag::Repeat;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// Class name → alternatives, in the order they are compiled.
pub type RuleSet = BTreeMap<String, Vec<Rule>>;

/// Read a rule set from its JSON form, e.g.
/// `{"root": [{"tokens": [{"input": "hi"}, {"output": "hello"}], "flag": "repeat"}]}`.
pub fn read_rule_set(reader: impl Read) -> Result<RuleSet, GrammarError> {
    Ok(serde_json::from_reader(reader)?)
}
