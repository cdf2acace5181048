//! AT&T text form: `src dest ilabel olabel [weight]` arc lines and
//! `state [weight]` final lines, with separate symbol tables.

use std::collections::{BTreeSet, HashMap};
use std::io::{BufRead, Write};

use tracing::{debug, debug_span};

use super::{Fst, FstArc, FstError, SymbolTable};

enum Line {
    Arc {
        src: u32,
        dest: u32,
        ilabel: u32,
        olabel: u32,
        weight: f32,
    },
    Final {
        state: u32,
        weight: f32,
    },
    Blank,
}

fn parse_field<T: std::str::FromStr>(field: &str, what: &str, line: usize) -> Result<T, FstError>
where
    T::Err: std::fmt::Display,
{
    field.parse().map_err(|e| FstError::Parse {
        line,
        reason: format!("invalid {what} '{field}': {e}"),
    })
}

fn parse_line(text: &str, line: usize) -> Result<Line, FstError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    match fields.len() {
        0 => Ok(Line::Blank),
        1 | 2 => Ok(Line::Final {
            state: parse_field(fields[0], "state", line)?,
            weight: match fields.get(1) {
                Some(w) => parse_field(w, "weight", line)?,
                None => 0.0,
            },
        }),
        4 | 5 => Ok(Line::Arc {
            src: parse_field(fields[0], "source state", line)?,
            dest: parse_field(fields[1], "destination state", line)?,
            ilabel: parse_field(fields[2], "input label", line)?,
            olabel: parse_field(fields[3], "output label", line)?,
            weight: match fields.get(4) {
                Some(w) => parse_field(w, "weight", line)?,
                None => 0.0,
            },
        }),
        n => Err(FstError::Parse {
            line,
            reason: format!("expected 1, 2, 4 or 5 fields, got {n}"),
        }),
    }
}

impl Fst {
    /// Load an FST from its text form plus input and output symbol tables.
    pub fn from_text(
        isymbols: impl BufRead,
        osymbols: impl BufRead,
        arcs: impl BufRead,
    ) -> Result<Fst, FstError> {
        let _span = debug_span!("fst_from_text").entered();

        let isymbols = SymbolTable::read_text(isymbols)?;
        let osymbols = SymbolTable::read_text(osymbols)?;

        let mut graph: Vec<HashMap<String, Vec<FstArc>>> = Vec::new();
        let mut final_weights = HashMap::new();

        for (idx, text) in arcs.lines().enumerate() {
            let line = idx + 1;
            let text = text?;
            match parse_line(&text, line)? {
                Line::Blank => {}
                Line::Final { state, weight } => {
                    final_weights.insert(state, weight);
                }
                Line::Arc {
                    src,
                    dest,
                    ilabel,
                    olabel,
                    weight,
                } => {
                    let isym = isymbols.symbol(ilabel).ok_or_else(|| FstError::Parse {
                        line,
                        reason: format!("input label {ilabel} not in symbol table"),
                    })?;
                    let osym = osymbols.symbol(olabel).ok_or_else(|| FstError::Parse {
                        line,
                        reason: format!("output label {olabel} not in symbol table"),
                    })?;
                    if osym.is_disambig() {
                        return Err(FstError::DisambigOutput(osym.to_string()));
                    }
                    if graph.len() <= src as usize {
                        graph.resize_with(src as usize + 1, HashMap::new);
                    }
                    graph[src as usize]
                        .entry(isym.encoded().into_owned())
                        .or_default()
                        .push(FstArc {
                            dest,
                            olabel,
                            weight,
                        });
                }
            }
        }

        debug!(
            states = graph.len(),
            finals = final_weights.len(),
            "text FST loaded"
        );
        Ok(Fst::from_parts(
            graph,
            final_weights,
            isymbols.to_dict(),
            osymbols,
        ))
    }
}

/// Rewrite every arc whose input label is a disambiguation symbol of
/// `isymbols` to an epsilon arc. Other lines pass through with their fields
/// re-joined by single spaces. Returns the number of rewritten arcs.
pub fn strip_disambig_text(
    reader: impl BufRead,
    mut writer: impl Write,
    isymbols: &SymbolTable,
) -> Result<usize, FstError> {
    let mut rewritten = 0;
    for (idx, text) in reader.lines().enumerate() {
        let text = text?;
        let mut fields: Vec<String> = text.split_whitespace().map(str::to_string).collect();
        if matches!(fields.len(), 4 | 5) {
            let ilabel: u32 = parse_field(&fields[2], "input label", idx + 1)?;
            if isymbols.symbol(ilabel).is_some_and(|s| s.is_disambig()) {
                fields[2] = "0".to_string();
                rewritten += 1;
            }
        }
        writeln!(writer, "{}", fields.join(" "))?;
    }
    debug!(rewritten, "disambiguation arcs stripped");
    Ok(rewritten)
}

/// Copy an arc list and append `final dest=0 ilabel olabel weight` for each
/// final state, in ascending state order.
pub fn add_final_selfloops(
    reader: impl BufRead,
    mut writer: impl Write,
    ilabel: u32,
    olabel: u32,
    weight: f32,
) -> Result<usize, FstError> {
    let mut finals = BTreeSet::new();
    for (idx, text) in reader.lines().enumerate() {
        let text = text?;
        if let Line::Final { state, .. } = parse_line(&text, idx + 1)? {
            finals.insert(state);
        }
        writeln!(writer, "{text}")?;
    }
    for state in &finals {
        writeln!(writer, "{state} 0 {ilabel} {olabel} {weight}")?;
    }
    Ok(finals.len())
}
