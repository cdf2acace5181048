//! JSON interchange document.

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Fst, FstArc, FstError, SymbolTable};
use crate::symbol::{Symbol, EPS_ID, EPS_SYM, UNK_ID, UNK_SYM};

pub(super) const DOCUMENT_VERSION: u32 = 1;

/// Output side of a document arc: an id into `osymbols`, or the encoded
/// symbol itself in documents written without an output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum OutputLabel {
    Id(u32),
    Symbol(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct FstDocument {
    version: u32,
    graph: Vec<BTreeMap<String, Vec<(u32, OutputLabel, f32)>>>,
    isymbol_dict: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    osymbols: Option<Vec<String>>,
    final_weights: Vec<(u32, f32)>,
}

/// Check that the input dictionary carries the reserved ids.
pub(super) fn check_isymbol_dict(isymbols: &HashMap<String, u32>) -> Result<(), FstError> {
    if isymbols.get(EPS_SYM) != Some(&EPS_ID) {
        return Err(FstError::Document("isymbol_dict: <eps> must have id 0".into()));
    }
    if isymbols.get(UNK_SYM) != Some(&UNK_ID) {
        return Err(FstError::Document("isymbol_dict: <unk> must have id 1".into()));
    }
    Ok(())
}

impl Fst {
    fn to_document(&self) -> FstDocument {
        let graph = self
            .graph
            .iter()
            .map(|labels| {
                labels
                    .iter()
                    .map(|(label, arcs)| {
                        let arcs = arcs
                            .iter()
                            .map(|a| (a.dest, OutputLabel::Id(a.olabel), a.weight))
                            .collect();
                        (label.clone(), arcs)
                    })
                    .collect()
            })
            .collect();

        FstDocument {
            version: DOCUMENT_VERSION,
            graph,
            isymbol_dict: self.isymbols.iter().map(|(k, &v)| (k.clone(), v)).collect(),
            osymbols: Some(self.osymbols.dense_names()),
            final_weights: self.final_states(),
        }
    }

    fn from_document(doc: FstDocument) -> Result<Fst, FstError> {
        if doc.version != DOCUMENT_VERSION {
            return Err(FstError::UnsupportedVersion(doc.version));
        }

        let isymbols: HashMap<String, u32> = doc.isymbol_dict.into_iter().collect();
        check_isymbol_dict(&isymbols)?;

        let has_osymbols = doc.osymbols.is_some();
        let mut osymbols = match &doc.osymbols {
            Some(names) => SymbolTable::from_dense_names(names)?,
            None => SymbolTable::new(),
        };

        let mut graph = Vec::with_capacity(doc.graph.len());
        for (state, labels) in doc.graph.into_iter().enumerate() {
            let mut out: HashMap<String, Vec<FstArc>> = HashMap::with_capacity(labels.len());
            for (label, arcs) in labels {
                // canonicalise the key the same way lookups do
                let key = Symbol::from_encoded(&label)?.encoded().into_owned();
                let entry = out.entry(key).or_default();
                for (dest, olabel, weight) in arcs {
                    let olabel = match olabel {
                        OutputLabel::Id(id) => {
                            if !has_osymbols {
                                return Err(FstError::Document(format!(
                                    "state {state}: output id {id} without osymbols"
                                )));
                            }
                            if osymbols.symbol(id).is_none() {
                                return Err(FstError::Document(format!(
                                    "state {state}: output id {id} not in osymbols"
                                )));
                            }
                            id
                        }
                        OutputLabel::Symbol(name) => {
                            let symbol = Symbol::from_encoded(&name)?;
                            if symbol.is_disambig() {
                                return Err(FstError::DisambigOutput(name));
                            }
                            osymbols.add_symbol(&symbol)?
                        }
                    };
                    entry.push(FstArc {
                        dest,
                        olabel,
                        weight,
                    });
                }
            }
            graph.push(out);
        }

        let final_weights = doc.final_weights.into_iter().collect();
        Ok(Fst::from_parts(graph, final_weights, isymbols, osymbols))
    }

    /// Serialize as a compact JSON document.
    pub fn to_json(&self, writer: impl Write) -> Result<(), FstError> {
        serde_json::to_writer(writer, &self.to_document())?;
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String, FstError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }

    /// Load from a JSON document. Outputs may be ids (with `osymbols`) or
    /// encoded symbol strings.
    pub fn from_json(reader: impl Read) -> Result<Fst, FstError> {
        let doc: FstDocument = serde_json::from_reader(reader)?;
        let fst = Fst::from_document(doc)?;
        debug!(states = fst.graph.len(), "JSON FST loaded");
        Ok(fst)
    }

    pub fn from_json_str(s: &str) -> Result<Fst, FstError> {
        Fst::from_document(serde_json::from_str(s)?)
    }
}
