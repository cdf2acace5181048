//! Immutable weighted FST and its interchange formats.
//!
//! `Fst` is the runtime form consumed by the decoder: per-state arc lists
//! keyed by encoded input label, a final-weight map, the input-symbol
//! dictionary and the output symbol table. It is built once (by
//! [`FstBuilder`] or one of the loaders) and never mutated afterwards, so a
//! single instance can be shared by any number of decoders.

pub mod algebra;
mod binary_io;
mod document;
mod symbol_table;
#[cfg(test)]
mod tests;
mod text_io;
mod writer;

use std::collections::HashMap;
use std::io;

use crate::symbol::{Symbol, SymbolError, EPS_SYM};

pub use symbol_table::SymbolTable;
pub use text_io::{add_final_selfloops, strip_disambig_text};
pub use writer::{FstBuilder, FstWriter, TextFstWriter};

/// Errors from loading, saving or writing transducers.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("invalid symbol table: {0}")]
    SymbolTable(String),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error("symbol not exist: {0}")]
    UnknownSymbol(String),

    #[error("disambiguation symbol {0} cannot be an output label")]
    DisambigOutput(String),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected LXFS)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u32),

    #[error("checksum mismatch")]
    Checksum,

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid document: {0}")]
    Document(String),

    #[error("FST data already written")]
    Finished,

    #[error("toolkit error: {0}")]
    Toolkit(String),
}

/// Outgoing arc target: `(dest, output label id, weight)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FstArc {
    pub dest: u32,
    pub olabel: u32,
    pub weight: f32,
}

/// Counters reported by `fsttool info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FstStats {
    pub states: usize,
    pub arcs: usize,
    pub epsilon_arcs: usize,
    pub final_states: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Fst {
    /// graph[src][encoded ilabel] -> arcs, in insertion order.
    graph: Vec<HashMap<String, Vec<FstArc>>>,
    final_weights: HashMap<u32, f32>,
    isymbols: HashMap<String, u32>,
    osymbols: SymbolTable,
}

impl Fst {
    pub(crate) fn from_parts(
        graph: Vec<HashMap<String, Vec<FstArc>>>,
        final_weights: HashMap<u32, f32>,
        isymbols: HashMap<String, u32>,
        osymbols: SymbolTable,
    ) -> Self {
        Self {
            graph,
            final_weights,
            isymbols,
            osymbols,
        }
    }

    /// Arcs leaving `state` whose input label is `label`.
    ///
    /// Reserved variants are looked up by their canonical encoding, so any
    /// `Symbol::Disambig(n)` with the same `n` finds the same arcs.
    pub fn arcs(&self, state: u32, label: &Symbol) -> &[FstArc] {
        self.arcs_by_label(state, &label.encoded())
    }

    /// Arcs leaving `state` for an already-encoded input label.
    pub fn arcs_by_label(&self, state: u32, label: &str) -> &[FstArc] {
        self.graph
            .get(state as usize)
            .and_then(|labels| labels.get(label))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Final weight of `state`, `None` if it is not accepting.
    pub fn final_weight(&self, state: u32) -> Option<f32> {
        self.final_weights.get(&state).copied()
    }

    /// Id of an encoded input label in the input dictionary.
    pub fn input_id(&self, label: &str) -> Option<u32> {
        self.isymbols.get(label).copied()
    }

    pub fn output_symbol(&self, olabel: u32) -> Option<&Symbol> {
        self.osymbols.symbol(olabel)
    }

    pub fn isymbol_dict(&self) -> &HashMap<String, u32> {
        &self.isymbols
    }

    pub fn osymbols(&self) -> &SymbolTable {
        &self.osymbols
    }

    /// Number of states, counting states that only appear as arc targets
    /// or final states.
    pub fn num_states(&self) -> usize {
        let max_dest = self
            .graph
            .iter()
            .flat_map(|labels| labels.values().flatten())
            .map(|arc| arc.dest as usize + 1)
            .max()
            .unwrap_or(0);
        let max_final = self
            .final_weights
            .keys()
            .map(|&s| s as usize + 1)
            .max()
            .unwrap_or(0);
        self.graph.len().max(max_dest).max(max_final)
    }

    /// `(state, encoded ilabel, arcs)` for every non-empty arc list, sorted
    /// by state then label so that serialized output is reproducible.
    pub fn labels(&self) -> Vec<(u32, &str, &[FstArc])> {
        let mut out = Vec::new();
        for (state, labels) in self.graph.iter().enumerate() {
            let mut keys: Vec<&String> = labels.keys().collect();
            keys.sort();
            for key in keys {
                out.push((state as u32, key.as_str(), labels[key].as_slice()));
            }
        }
        out
    }

    /// Final states sorted by id.
    pub fn final_states(&self) -> Vec<(u32, f32)> {
        let mut finals: Vec<(u32, f32)> = self.final_weights.iter().map(|(&s, &w)| (s, w)).collect();
        finals.sort_by_key(|&(s, _)| s);
        finals
    }

    pub fn stats(&self) -> FstStats {
        let arcs = self
            .graph
            .iter()
            .flat_map(|labels| labels.values())
            .map(Vec::len)
            .sum();
        let epsilon_arcs = self
            .graph
            .iter()
            .filter_map(|labels| labels.get(EPS_SYM))
            .map(Vec::len)
            .sum();
        FstStats {
            states: self.num_states(),
            arcs,
            epsilon_arcs,
            final_states: self.final_weights.len(),
        }
    }

    /// A new FST whose disambiguation arcs become epsilon arcs.
    ///
    /// Used once determinization no longer needs the markers; decoding a
    /// lexicon FST with prefix-colliding entries requires this step, since
    /// no input ever carries a `#n` label.
    pub fn without_disambig(&self) -> Fst {
        let graph = self
            .graph
            .iter()
            .map(|labels| {
                let mut stripped: HashMap<String, Vec<FstArc>> =
                    HashMap::with_capacity(labels.len());
                let mut keys: Vec<&String> = labels.keys().collect();
                keys.sort();
                for key in keys {
                    let is_disambig = Symbol::from_encoded(key)
                        .map(|s| s.is_disambig())
                        .unwrap_or(false);
                    let target = if is_disambig { EPS_SYM } else { key.as_str() };
                    stripped
                        .entry(target.to_string())
                        .or_default()
                        .extend_from_slice(&labels[key]);
                }
                stripped
            })
            .collect();

        let isymbols = self
            .isymbols
            .iter()
            .filter(|(name, _)| {
                !Symbol::from_encoded(name)
                    .map(|s| s.is_disambig())
                    .unwrap_or(false)
            })
            .map(|(name, &id)| (name.clone(), id))
            .collect();

        Fst {
            graph,
            final_weights: self.final_weights.clone(),
            isymbols,
            osymbols: self.osymbols.clone(),
        }
    }
}
