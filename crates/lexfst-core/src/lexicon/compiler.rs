use tracing::{debug, debug_span};

use super::{add_disambig, LexiconEntry, LexiconError, UnknownPolicy};
use crate::fst::FstWriter;
use crate::settings::settings;
use crate::symbol::{Symbol, BRK_SYM, CAP_EPS_SYM, CAP_SYM};

/// Compiles a lexicon into a trie whose leaves loop back to state 0, so
/// the result accepts any concatenation of lexicon words.
#[derive(Debug, Clone)]
pub struct LexiconCompiler {
    policy: UnknownPolicy,
    unknown_factor: f64,
    word_break: bool,
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

impl LexiconCompiler {
    /// Compiler with the given policy and the configured unknown factor.
    pub fn new(policy: UnknownPolicy) -> Self {
        Self {
            policy,
            unknown_factor: settings().lexicon.unknown_factor,
            word_break: false,
        }
    }

    /// Policy and unknown factor both taken from settings.
    pub fn from_settings() -> Self {
        Self::new(settings().lexicon.unknown_policy())
    }

    pub fn with_unknown_factor(mut self, factor: f64) -> Self {
        self.unknown_factor = factor;
        self
    }

    /// Emit `<break>` after every word and every unknown symbol.
    pub fn with_word_break(mut self, word_break: bool) -> Self {
        self.word_break = word_break;
        self
    }

    pub fn policy(&self) -> UnknownPolicy {
        self.policy
    }

    /// Cost of the unknown self-loop for a lexicon whose cheapest entry
    /// weighs `min_weight`.
    pub fn unknown_weight(&self, min_weight: f32) -> f32 {
        (min_weight as f64 + round3(-self.unknown_factor.ln())) as f32
    }

    /// Compile `lexicon` into `writer` and finish it.
    ///
    /// Returns the disambiguated lexicon. Entries are validated before
    /// anything is written.
    pub fn compile(
        &self,
        lexicon: &[LexiconEntry],
        writer: &mut dyn FstWriter,
    ) -> Result<Vec<LexiconEntry>, LexiconError> {
        let _span = debug_span!("compile_lexicon", entries = lexicon.len(), policy = %self.policy)
            .entered();

        for (index, entry) in lexicon.iter().enumerate() {
            if entry.word.is_empty() {
                return Err(LexiconError::EmptyWord { index });
            }
            if entry.symbols.is_empty() {
                return Err(LexiconError::EmptySymbols {
                    index,
                    word: entry.word.clone(),
                });
            }
        }

        let disambig_lexicon = add_disambig(lexicon);
        let markers = disambig_lexicon
            .iter()
            .zip(lexicon)
            .filter(|(d, e)| d.symbols.len() != e.symbols.len())
            .count();
        debug!(markers, "disambiguation symbols added");

        let brk = Symbol::Text(BRK_SYM.to_string());
        let mut min_weight = f32::INFINITY;
        for entry in &disambig_lexicon {
            min_weight = min_weight.min(entry.weight);
            let output = Symbol::Text(entry.word.clone());
            let last = entry.symbols.len() - 1;
            let mut state = 0;
            for (idx, symbol) in entry.symbols.iter().enumerate() {
                let (osymbol, weight) = if idx == 0 {
                    (&output, entry.weight)
                } else {
                    (&Symbol::Eps, 0.0)
                };
                let next = if idx == last && !self.word_break {
                    0
                } else {
                    writer.create_state()
                };
                writer.add_arc(state, next, symbol, osymbol, weight)?;
                state = next;
            }
            if self.word_break {
                writer.add_arc(state, 0, &Symbol::Eps, &brk, 0.0)?;
            }
        }

        if !min_weight.is_finite() {
            min_weight = 0.0;
        }
        let capture = match self.policy {
            UnknownPolicy::Output => Some(CAP_SYM),
            UnknownPolicy::Ignore => Some(CAP_EPS_SYM),
            UnknownPolicy::Fail => None,
        };
        if let Some(capture) = capture {
            let weight = self.unknown_weight(min_weight);
            let capture = Symbol::Text(capture.to_string());
            if self.word_break {
                let state = writer.create_state();
                writer.add_arc(0, state, &Symbol::Unk, &capture, weight)?;
                writer.add_arc(state, 0, &Symbol::Eps, &brk, 0.0)?;
            } else {
                writer.add_arc(0, 0, &Symbol::Unk, &capture, weight)?;
            }
            debug!(weight, "unknown arc added");
        }

        writer.set_final(0, 0.0)?;
        writer.finish()?;
        Ok(disambig_lexicon)
    }
}
