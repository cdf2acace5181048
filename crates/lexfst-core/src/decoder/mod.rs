//! Beam-search decoder over an immutable [`Fst`].
//!
//! Each call to [`Decoder::decode`] owns its token arena and beam; the FST
//! is only read, so one `Fst` can serve any number of decoders on any
//! number of threads.
//!
//! Per input symbol the beam is pruned to `beam_size`, expanded through
//! epsilon arcs, then advanced on the escaped symbol (or on `<unk>` when
//! the symbol is not in the input dictionary). The FST must not contain
//! epsilon cycles: closure follows them without bound.

mod beam;
mod output;
#[cfg(test)]
mod tests;

use tracing::{debug, debug_span};

use crate::fst::Fst;
use crate::settings::settings;
use crate::symbol::escape;

use beam::Search;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("capture mismatch: {markers} capture markers, {captures} captured symbols")]
    CaptureMismatch { markers: usize, captures: usize },

    #[error("unexpected output symbol: {0}")]
    UnexpectedSymbol(String),

    #[error("output label {0} not in output symbol table")]
    DanglingOutput(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    fst: &'a Fst,
    beam_size: usize,
}

impl<'a> Decoder<'a> {
    /// Decoder with the configured beam size.
    pub fn new(fst: &'a Fst) -> Self {
        Self::with_beam_size(fst, settings().decoder.beam_size)
    }

    pub fn with_beam_size(fst: &'a Fst, beam_size: usize) -> Self {
        Self {
            fst,
            beam_size: beam_size.max(1),
        }
    }

    pub fn beam_size(&self) -> usize {
        self.beam_size
    }

    pub fn fst(&self) -> &'a Fst {
        self.fst
    }

    /// Decode a sequence of literal input symbols.
    ///
    /// Returns the output symbols of the cheapest path ending in a final
    /// state: epsilons and disambiguation markers dropped, captures
    /// substituted, ordinary symbols unescaped, `<break>` kept verbatim.
    /// An exhausted beam yields an empty vector.
    pub fn decode<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<String>, DecodeError> {
        let _span =
            debug_span!("decode", inputs = inputs.len(), beam_size = self.beam_size).entered();

        let mut search = Search::new(self.fst, self.beam_size);
        for (pos, input) in inputs.iter().enumerate() {
            search.prune();
            search.epsilon_closure();
            search.step(pos, &escape(input.as_ref()));
            if search.is_exhausted() {
                debug!(pos, "beam exhausted");
                return Ok(Vec::new());
            }
        }

        let Some((best, cost)) = search.finalize() else {
            debug!("no token reached a final state");
            return Ok(Vec::new());
        };
        debug!(cost, tokens = search.num_tokens(), "best path found");

        let path = search.backtrack(best);
        output::render(self.fst, &path, inputs)
    }

    /// Decode `text` one character at a time.
    pub fn decode_str(&self, text: &str) -> Result<Vec<String>, DecodeError> {
        let inputs: Vec<String> = text.chars().map(String::from).collect();
        self.decode(&inputs)
    }
}
