use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use lexfst_core::fst::TextFstWriter;
use lexfst_core::lexicon::{
    add_ilabel_selfloops, read_lexicon_file, write_lexicon, LexiconCompiler, UnknownPolicy,
};
use lexfst_core::settings::settings;

/// Output paths of a compiled lexicon.
pub struct CompileOutputs<'a> {
    pub fst: &'a str,
    pub isyms: &'a str,
    pub osyms: &'a str,
    /// Where to dump the lexicon after disambiguation symbols were added.
    pub disambig_lexicon: Option<&'a str>,
}

pub struct CompileOptions {
    pub policy: Option<UnknownPolicy>,
    pub unknown_factor: Option<f64>,
    pub word_break: bool,
    /// Add `c -> c` entries for single input symbols missing from the
    /// lexicon, with weight `max_weight - ln factor`.
    pub selfloop_factor: Option<f64>,
}

pub fn compile_lexicon(lexicon_file: &str, out: &CompileOutputs<'_>, opts: &CompileOptions) {
    let mut lexicon = die!(
        read_lexicon_file(Path::new(lexicon_file)),
        "Error reading lexicon {lexicon_file}: {}"
    );
    eprintln!("Read {} entries from {lexicon_file}", lexicon.len());

    if let Some(factor) = opts.selfloop_factor {
        let before = lexicon.len();
        lexicon = add_ilabel_selfloops(&lexicon, factor);
        eprintln!("Added {} identity entries", lexicon.len() - before);
    }

    let lexicon_settings = &settings().lexicon;
    let compiler = LexiconCompiler::new(opts.policy.unwrap_or(lexicon_settings.unknown_policy()))
        .with_unknown_factor(opts.unknown_factor.unwrap_or(lexicon_settings.unknown_factor))
        .with_word_break(opts.word_break);

    let fst_out = die!(File::create(out.fst), "Error creating {}: {}", out.fst);
    let isym_out = die!(File::create(out.isyms), "Error creating {}: {}", out.isyms);
    let osym_out = die!(File::create(out.osyms), "Error creating {}: {}", out.osyms);
    let mut writer = TextFstWriter::new(
        BufWriter::new(fst_out),
        BufWriter::new(isym_out),
        BufWriter::new(osym_out),
    );

    let disambiguated = die!(
        compiler.compile(&lexicon, &mut writer),
        "Error compiling lexicon: {}"
    );
    eprintln!(
        "Compiled {} entries ({} input symbols, {} output symbols, policy {})",
        disambiguated.len(),
        writer.isymbols().len(),
        writer.osymbols().len(),
        compiler.policy()
    );

    if let Some(path) = out.disambig_lexicon {
        let file = die!(File::create(path), "Error creating {path}: {}");
        die!(
            write_lexicon(&disambiguated, BufWriter::new(file)),
            "Error writing {path}: {}"
        );
        eprintln!("Wrote disambiguated lexicon to {path}");
    }
}
