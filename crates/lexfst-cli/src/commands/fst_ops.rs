use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use lexfst_core::fst::{add_final_selfloops, strip_disambig_text};
use lexfst_core::symbol::Symbol;

use super::{load_fst, read_symbol_table, TextSymbols};

pub fn rm_disambig(fst_in: &str, fst_out: &str, isyms: &str) {
    let table = die!(read_symbol_table(Path::new(isyms)), "Error: {}");
    let input = die!(File::open(fst_in), "Error opening {fst_in}: {}");
    let output = die!(File::create(fst_out), "Error creating {fst_out}: {}");
    let mut writer = BufWriter::new(output);
    let rewritten = die!(
        strip_disambig_text(BufReader::new(input), &mut writer, &table),
        "Error rewriting {fst_in}: {}"
    );
    die!(writer.flush(), "Error writing {fst_out}: {}");
    eprintln!("Rewrote {rewritten} disambiguation arcs");
}

/// Drop `#n` entries from a symbol table file, in place.
pub fn rm_disambig_syms(syms: &str) {
    let table = die!(read_symbol_table(Path::new(syms)), "Error: {}");
    let stripped = table.without_disambig();
    let removed = table.len() - stripped.len();
    let mut buf = Vec::new();
    die!(stripped.write_text(&mut buf), "Error: {}");
    die!(fs::write(syms, buf), "Error writing {syms}: {}");
    eprintln!("Removed {removed} disambiguation symbols from {syms}");
}

pub struct SelfLoop<'a> {
    pub isymbol: &'a str,
    pub osymbol: &'a str,
    pub weight: f32,
}

pub fn add_selfloop(fst_in: &str, fst_out: &str, isyms: &str, osyms: &str, lp: &SelfLoop<'_>) {
    let resolve = |table_file: &str, name: &str| -> u32 {
        let table = die!(read_symbol_table(Path::new(table_file)), "Error: {}");
        let symbol = die!(Symbol::from_encoded(name), "Error: {}");
        match table.id(&symbol) {
            Some(id) => id,
            None => {
                eprintln!("Error: symbol '{name}' not in {table_file}");
                std::process::exit(1);
            }
        }
    };
    let ilabel = resolve(isyms, lp.isymbol);
    let olabel = resolve(osyms, lp.osymbol);

    let input = die!(File::open(fst_in), "Error opening {fst_in}: {}");
    let output = die!(File::create(fst_out), "Error creating {fst_out}: {}");
    let mut writer = BufWriter::new(output);
    let added = die!(
        add_final_selfloops(BufReader::new(input), &mut writer, ilabel, olabel, lp.weight),
        "Error rewriting {fst_in}: {}"
    );
    die!(writer.flush(), "Error writing {fst_out}: {}");
    eprintln!("Added {added} loops {}:{}", lp.isymbol, lp.osymbol);
}

pub fn to_json(input: &str, output: &str, symbols: Option<TextSymbols<'_>>) {
    let fst = die!(load_fst(Path::new(input), symbols), "Error: {}");
    let file = die!(File::create(output), "Error creating {output}: {}");
    let mut writer = BufWriter::new(file);
    die!(fst.to_json(&mut writer), "Error writing {output}: {}");
    die!(writer.flush(), "Error writing {output}: {}");
    eprintln!("Wrote {} states to {output}", fst.num_states());
}

pub fn to_bin(input: &str, output: &str, symbols: Option<TextSymbols<'_>>) {
    let fst = die!(load_fst(Path::new(input), symbols), "Error: {}");
    die!(fst.save(Path::new(output)), "Error writing {output}: {}");
    eprintln!("Wrote {} states to {output}", fst.num_states());
}

pub fn info(input: &str, symbols: Option<TextSymbols<'_>>) {
    let fst = die!(load_fst(Path::new(input), symbols), "Error: {}");
    let stats = fst.stats();
    println!("states:         {}", stats.states);
    println!("arcs:           {}", stats.arcs);
    println!("epsilon arcs:   {}", stats.epsilon_arcs);
    println!("final states:   {}", stats.final_states);
    println!("input symbols:  {}", fst.isymbol_dict().len());
    println!("output symbols: {}", fst.osymbols().len());
}
