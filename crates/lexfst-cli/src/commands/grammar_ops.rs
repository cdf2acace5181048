use std::fs::File;
use std::io::{BufReader, BufWriter};

use lexfst_core::fst::TextFstWriter;
use lexfst_core::grammar::{read_rule_set, GrammarCompiler};

/// Compile the JSON rule set in `rules_file` from class `root` into a
/// text-form FST and symbol tables.
pub fn compile_grammar(rules_file: &str, root: &str, fst: &str, isyms: &str, osyms: &str) {
    let file = die!(File::open(rules_file), "Error opening {rules_file}: {}");
    let rules = die!(
        read_rule_set(BufReader::new(file)),
        "Error reading grammar {rules_file}: {}"
    );
    eprintln!("Read {} classes from {rules_file}", rules.len());

    let fst_out = die!(File::create(fst), "Error creating {fst}: {}");
    let isym_out = die!(File::create(isyms), "Error creating {isyms}: {}");
    let osym_out = die!(File::create(osyms), "Error creating {osyms}: {}");
    let mut writer = TextFstWriter::new(
        BufWriter::new(fst_out),
        BufWriter::new(isym_out),
        BufWriter::new(osym_out),
    );
    die!(
        GrammarCompiler::new(&rules).compile(root, &mut writer),
        "Error compiling grammar: {}"
    );
    eprintln!(
        "Compiled <{root}> ({} input symbols, {} output symbols)",
        writer.isymbols().len(),
        writer.osymbols().len()
    );
}
