use std::collections::HashMap;
use std::io::Write;

use super::{Fst, FstArc, FstError, SymbolTable};
use crate::symbol::Symbol;

/// Sink for FST construction. State 0 exists up front and is the start
/// state; every other state comes from [`create_state`](Self::create_state).
pub trait FstWriter {
    fn create_state(&mut self) -> u32;

    fn add_arc(
        &mut self,
        src: u32,
        dest: u32,
        isymbol: &Symbol,
        osymbol: &Symbol,
        weight: f32,
    ) -> Result<(), FstError>;

    fn set_final(&mut self, state: u32, weight: f32) -> Result<(), FstError>;

    /// Flush whatever the backend holds back until construction is done.
    /// Calling it twice is an error.
    fn finish(&mut self) -> Result<(), FstError>;
}

fn check_output(osymbol: &Symbol) -> Result<(), FstError> {
    if osymbol.is_disambig() {
        return Err(FstError::DisambigOutput(osymbol.to_string()));
    }
    Ok(())
}

/// Writes the AT&T text form as arcs arrive and the symbol tables on
/// [`finish`](FstWriter::finish).
pub struct TextFstWriter<'a> {
    fst_out: Box<dyn Write + 'a>,
    isym_out: Option<Box<dyn Write + 'a>>,
    osym_out: Option<Box<dyn Write + 'a>>,
    isymbols: SymbolTable,
    osymbols: SymbolTable,
    num_states: u32,
    finished: bool,
}

impl<'a> TextFstWriter<'a> {
    /// Build symbol tables on the fly and write them to `isym_out` and
    /// `osym_out` at finish.
    pub fn new(
        fst_out: impl Write + 'a,
        isym_out: impl Write + 'a,
        osym_out: impl Write + 'a,
    ) -> Self {
        Self {
            fst_out: Box::new(fst_out),
            isym_out: Some(Box::new(isym_out)),
            osym_out: Some(Box::new(osym_out)),
            isymbols: SymbolTable::new(),
            osymbols: SymbolTable::new(),
            num_states: 1,
            finished: false,
        }
    }

    /// Use fixed tables; symbols missing from them are an error.
    pub fn with_symbol_tables(
        fst_out: impl Write + 'a,
        mut isymbols: SymbolTable,
        mut osymbols: SymbolTable,
    ) -> Self {
        isymbols.set_readonly(true);
        osymbols.set_readonly(true);
        Self {
            fst_out: Box::new(fst_out),
            isym_out: None,
            osym_out: None,
            isymbols,
            osymbols,
            num_states: 1,
            finished: false,
        }
    }

    pub fn isymbols(&self) -> &SymbolTable {
        &self.isymbols
    }

    pub fn osymbols(&self) -> &SymbolTable {
        &self.osymbols
    }
}

impl FstWriter for TextFstWriter<'_> {
    fn create_state(&mut self) -> u32 {
        self.num_states += 1;
        self.num_states - 1
    }

    fn add_arc(
        &mut self,
        src: u32,
        dest: u32,
        isymbol: &Symbol,
        osymbol: &Symbol,
        weight: f32,
    ) -> Result<(), FstError> {
        if self.finished {
            return Err(FstError::Finished);
        }
        check_output(osymbol)?;
        let ilabel = self.isymbols.add_symbol(isymbol)?;
        let olabel = self.osymbols.add_symbol(osymbol)?;
        writeln!(self.fst_out, "{src} {dest} {ilabel} {olabel} {weight}")?;
        Ok(())
    }

    fn set_final(&mut self, state: u32, weight: f32) -> Result<(), FstError> {
        if self.finished {
            return Err(FstError::Finished);
        }
        writeln!(self.fst_out, "{state} {weight}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FstError> {
        if self.finished {
            return Err(FstError::Finished);
        }
        self.finished = true;
        self.fst_out.flush()?;
        if let Some(out) = self.isym_out.as_mut() {
            self.isymbols.write_text(&mut *out)?;
            out.flush()?;
        }
        if let Some(out) = self.osym_out.as_mut() {
            self.osymbols.write_text(&mut *out)?;
            out.flush()?;
        }
        Ok(())
    }
}

/// In-memory backend producing an immutable [`Fst`].
#[derive(Debug)]
pub struct FstBuilder {
    graph: Vec<HashMap<String, Vec<FstArc>>>,
    final_weights: HashMap<u32, f32>,
    isymbols: SymbolTable,
    osymbols: SymbolTable,
    finished: bool,
}

impl Default for FstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FstBuilder {
    pub fn new() -> Self {
        Self {
            graph: vec![HashMap::new()],
            final_weights: HashMap::new(),
            isymbols: SymbolTable::new(),
            osymbols: SymbolTable::new(),
            finished: false,
        }
    }

    pub fn with_symbol_tables(mut isymbols: SymbolTable, mut osymbols: SymbolTable) -> Self {
        isymbols.set_readonly(true);
        osymbols.set_readonly(true);
        Self {
            isymbols,
            osymbols,
            ..Self::new()
        }
    }

    pub fn build(self) -> Fst {
        Fst::from_parts(
            self.graph,
            self.final_weights,
            self.isymbols.to_dict(),
            self.osymbols,
        )
    }
}

impl FstWriter for FstBuilder {
    fn create_state(&mut self) -> u32 {
        self.graph.push(HashMap::new());
        self.graph.len() as u32 - 1
    }

    fn add_arc(
        &mut self,
        src: u32,
        dest: u32,
        isymbol: &Symbol,
        osymbol: &Symbol,
        weight: f32,
    ) -> Result<(), FstError> {
        if self.finished {
            return Err(FstError::Finished);
        }
        check_output(osymbol)?;
        self.isymbols.add_symbol(isymbol)?;
        let olabel = self.osymbols.add_symbol(osymbol)?;
        if self.graph.len() <= src as usize {
            self.graph.resize_with(src as usize + 1, HashMap::new);
        }
        self.graph[src as usize]
            .entry(isymbol.encoded().into_owned())
            .or_default()
            .push(FstArc {
                dest,
                olabel,
                weight,
            });
        Ok(())
    }

    fn set_final(&mut self, state: u32, weight: f32) -> Result<(), FstError> {
        if self.finished {
            return Err(FstError::Finished);
        }
        self.final_weights.insert(state, weight);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FstError> {
        if self.finished {
            return Err(FstError::Finished);
        }
        self.finished = true;
        Ok(())
    }
}
