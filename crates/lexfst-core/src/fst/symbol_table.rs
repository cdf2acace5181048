use std::collections::{BTreeMap, HashMap};
use std::io::{BufRead, Write};

use tracing::debug;

use super::FstError;
use crate::symbol::{Symbol, DISAMBIG_OFFSET, EPS_ID, UNK_ID};

/// Bijective mapping between symbols and label ids.
///
/// Ids 0 and 1 always hold `<eps>` and `<unk>`. Ordinary symbols take the
/// next free id below [`DISAMBIG_OFFSET`]; `Disambig(n)` is pinned to
/// `DISAMBIG_OFFSET + n` and tracked separately so the dense range stays
/// small.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolTable {
    /// symbols[id] for ids below `DISAMBIG_OFFSET`; `None` marks a gap left
    /// by a loaded file.
    symbols: Vec<Option<Symbol>>,
    ids: HashMap<String, u32>,
    disambig: BTreeMap<u32, Symbol>,
    readonly: bool,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: vec![Some(Symbol::Eps), Some(Symbol::Unk)],
            ids: HashMap::new(),
            disambig: BTreeMap::new(),
            readonly: false,
        }
    }

    /// Return the id of `symbol`, assigning the next free id if it is new.
    ///
    /// A read-only table refuses unseen symbols.
    pub fn add_symbol(&mut self, symbol: &Symbol) -> Result<u32, FstError> {
        if let Some(id) = self.id(symbol) {
            return Ok(id);
        }
        if self.readonly {
            return Err(FstError::UnknownSymbol(symbol.to_string()));
        }
        match symbol {
            Symbol::Eps => Ok(EPS_ID),
            Symbol::Unk => Ok(UNK_ID),
            Symbol::Disambig(n) => {
                let id = symbol.reserved_id().ok_or_else(|| {
                    FstError::SymbolTable(format!("{symbol} beyond the label id range"))
                })?;
                self.disambig.insert(*n, symbol.clone());
                Ok(id)
            }
            Symbol::Text(s) => {
                let id = self.symbols.len() as u32;
                if id >= DISAMBIG_OFFSET {
                    return Err(FstError::SymbolTable(
                        "ordinary symbol ids exhausted".to_string(),
                    ));
                }
                self.symbols.push(Some(symbol.clone()));
                self.ids.insert(s.clone(), id);
                Ok(id)
            }
        }
    }

    pub fn id(&self, symbol: &Symbol) -> Option<u32> {
        match symbol {
            Symbol::Eps => Some(EPS_ID),
            Symbol::Unk => Some(UNK_ID),
            Symbol::Disambig(n) => self
                .disambig
                .contains_key(n)
                .then(|| symbol.reserved_id())
                .flatten(),
            Symbol::Text(s) => self.ids.get(s).copied(),
        }
    }

    pub fn symbol(&self, id: u32) -> Option<&Symbol> {
        if id >= DISAMBIG_OFFSET {
            return self.disambig.get(&(id - DISAMBIG_OFFSET));
        }
        self.symbols.get(id as usize).and_then(Option::as_ref)
    }

    /// Number of symbols, reserved ones included.
    pub fn len(&self) -> usize {
        self.symbols.iter().flatten().count() + self.disambig.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    /// `(id, symbol)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_ref().map(|s| (id as u32, s)))
            .chain(
                self.disambig
                    .iter()
                    .map(|(n, s)| (DISAMBIG_OFFSET + n, s)),
            )
    }

    /// Encoded label → id for every symbol in the table.
    pub fn to_dict(&self) -> HashMap<String, u32> {
        self.iter()
            .map(|(id, s)| (s.encoded().into_owned(), id))
            .collect()
    }

    /// A copy without any `#n` symbols.
    pub fn without_disambig(&self) -> SymbolTable {
        SymbolTable {
            symbols: self.symbols.clone(),
            ids: self.ids.clone(),
            disambig: BTreeMap::new(),
            readonly: self.readonly,
        }
    }

    /// Load a `symbol id` table. The result is read-only.
    pub fn read_text(reader: impl BufRead) -> Result<Self, FstError> {
        let mut table = SymbolTable {
            symbols: Vec::new(),
            ids: HashMap::new(),
            disambig: BTreeMap::new(),
            readonly: true,
        };

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != 2 {
                return Err(FstError::Parse {
                    line: line_no,
                    reason: format!("invalid line in symbol table: {}", line.trim()),
                });
            }
            let id: u32 = fields[1].parse().map_err(|e| FstError::Parse {
                line: line_no,
                reason: format!("invalid symbol id '{}': {e}", fields[1]),
            })?;
            let symbol = Symbol::from_encoded(fields[0]).map_err(|e| FstError::Parse {
                line: line_no,
                reason: e.to_string(),
            })?;
            table.insert_loaded(symbol, id, line_no)?;
        }

        table.check_reserved()?;
        debug!(symbols = table.len(), disambig = table.disambig.len(), "symbol table loaded");
        Ok(table)
    }

    /// Rebuild a table from names indexed by id, as stored in interchange
    /// documents. Empty names are gaps. The result is writable.
    pub(crate) fn from_dense_names(names: &[String]) -> Result<Self, FstError> {
        let mut table = SymbolTable {
            symbols: Vec::with_capacity(names.len()),
            ids: HashMap::new(),
            disambig: BTreeMap::new(),
            readonly: false,
        };
        for (id, name) in names.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let symbol = Symbol::from_encoded(name)?;
            table
                .insert_loaded(symbol, id as u32, id + 1)
                .map_err(|e| FstError::Document(format!("osymbols: {e}")))?;
        }
        table.check_reserved()?;
        Ok(table)
    }

    /// Names indexed by id for every id below the disambiguation range.
    /// Gaps are empty strings.
    pub(crate) fn dense_names(&self) -> Vec<String> {
        self.symbols
            .iter()
            .map(|s| s.as_ref().map(|s| s.encoded().into_owned()).unwrap_or_default())
            .collect()
    }

    fn check_reserved(&self) -> Result<(), FstError> {
        if self.symbols.first().and_then(Option::as_ref) != Some(&Symbol::Eps) {
            return Err(FstError::SymbolTable("id 0 must be <eps>".to_string()));
        }
        if self.symbols.get(1).and_then(Option::as_ref) != Some(&Symbol::Unk) {
            return Err(FstError::SymbolTable("id 1 must be <unk>".to_string()));
        }
        Ok(())
    }

    fn insert_loaded(&mut self, symbol: Symbol, id: u32, line: usize) -> Result<(), FstError> {
        let reject = |reason: String| FstError::Parse { line, reason };

        if let Some(expected) = symbol.reserved_id() {
            if expected != id {
                return Err(reject(format!(
                    "reserved symbol {symbol} must have id {expected}, got {id}"
                )));
            }
        } else if id == EPS_ID || id == UNK_ID {
            return Err(reject(format!(
                "id {id} is reserved for {}",
                if id == EPS_ID { "<eps>" } else { "<unk>" }
            )));
        } else if id >= DISAMBIG_OFFSET {
            return Err(reject(format!(
                "symbol {symbol} collides with the disambiguation id range (id {id})"
            )));
        }

        if let Symbol::Disambig(n) = symbol {
            if self.disambig.insert(n, symbol).is_some() {
                return Err(reject(format!("duplicate symbol id {id}")));
            }
            return Ok(());
        }

        let slot = id as usize;
        if self.symbols.len() <= slot {
            self.symbols.resize(slot + 1, None);
        }
        if self.symbols[slot].is_some() {
            return Err(reject(format!("duplicate symbol id {id}")));
        }
        if let Symbol::Text(s) = &symbol {
            if self.ids.insert(s.clone(), id).is_some() {
                return Err(reject(format!("duplicate symbol {s}")));
            }
        }
        self.symbols[slot] = Some(symbol);
        Ok(())
    }

    /// Write the table as `symbol id` lines in ascending id order.
    pub fn write_text(&self, mut writer: impl Write) -> Result<(), FstError> {
        for (id, symbol) in self.iter() {
            writeln!(writer, "{symbol} {id}")?;
        }
        Ok(())
    }
}
