use clap::{Parser, Subcommand};

use lexfst_cli::commands::{
    config_ops, decode_ops, fst_ops, grammar_ops, lexicon_ops, text_symbols,
};
use lexfst_core::lexicon::UnknownPolicy;

#[derive(Parser)]
#[command(name = "fsttool", about = "Lexicon FST compilation and decoding")]
struct Cli {
    /// Settings file overriding the built-in defaults
    #[arg(long, global = true)]
    settings: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct SymbolArgs {
    /// Input symbol table (text-form FST input)
    #[arg(long)]
    isyms: Option<String>,
    /// Output symbol table (text-form FST input)
    #[arg(long)]
    osyms: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a lexicon into a text-form FST and symbol tables
    CompileLexicon {
        /// Lexicon file: `word probability symbol...` per line
        lexicon: String,
        /// Output FST arc list
        #[arg(long)]
        fst: String,
        /// Output input symbol table
        #[arg(long)]
        isyms: String,
        /// Output output symbol table
        #[arg(long)]
        osyms: String,
        /// Unknown input handling: output, ignore or fail
        #[arg(long)]
        policy: Option<UnknownPolicy>,
        /// Scale of the unknown arc weight, in (0, 1]
        #[arg(long)]
        unknown_factor: Option<f64>,
        /// Emit <break> after every word
        #[arg(long)]
        word_break: bool,
        /// Add identity entries for missing single symbols with this factor
        #[arg(long)]
        ilabel_selfloops: Option<f64>,
        /// Write the disambiguated lexicon here
        #[arg(long)]
        disambig_lexicon: Option<String>,
    },
    /// Compile a JSON grammar rule set into a text-form FST and symbol tables
    CompileGrammar {
        /// Rule set: class name to a list of rules
        rules: String,
        /// Class to compile from
        #[arg(long, default_value = "root")]
        root: String,
        #[arg(long)]
        fst: String,
        #[arg(long)]
        isyms: String,
        #[arg(long)]
        osyms: String,
    },
    /// Replace disambiguation input labels by epsilon in a text-form FST
    RmDisambig {
        input: String,
        output: String,
        /// Input symbol table
        #[arg(long)]
        isyms: String,
    },
    /// Remove disambiguation symbols from a symbol table file in place
    RmDisambigSyms {
        syms: String,
    },
    /// Add a loop from every final state back to state 0
    AddSelfloop {
        input: String,
        output: String,
        #[arg(long)]
        isyms: String,
        #[arg(long)]
        osyms: String,
        /// Input symbol of the loop
        #[arg(long)]
        isymbol: String,
        /// Output symbol of the loop
        #[arg(long)]
        osymbol: String,
        #[arg(long, default_value_t = 0.0)]
        weight: f32,
    },
    /// Write an FST as a JSON document
    ToJson {
        input: String,
        output: String,
        #[command(flatten)]
        symbols: SymbolArgs,
    },
    /// Write an FST as an LXFS binary snapshot
    ToBin {
        input: String,
        output: String,
        #[command(flatten)]
        symbols: SymbolArgs,
    },
    /// Print FST statistics (format auto-detected by magic bytes)
    Info {
        input: String,
        #[command(flatten)]
        symbols: SymbolArgs,
    },
    /// Decode a sequence of input symbols
    Decode {
        fst: String,
        /// Input symbols
        #[arg(required = true)]
        input: Vec<String>,
        #[command(flatten)]
        symbols: SymbolArgs,
        /// Beam width (default from settings)
        #[arg(long)]
        beam: Option<usize>,
    },
    /// Split text into words with a <break>-emitting lexicon FST
    Segment {
        fst: String,
        text: String,
        #[command(flatten)]
        symbols: SymbolArgs,
        #[arg(long)]
        beam: Option<usize>,
    },
    /// Rewrite text character by character
    Convert {
        fst: String,
        text: String,
        #[command(flatten)]
        symbols: SymbolArgs,
        #[arg(long)]
        beam: Option<usize>,
    },
    /// Print the default settings TOML
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate {
        file: String,
    },
}

fn main() {
    lexfst_cli::trace_init::init_tracing();
    let cli = Cli::parse();

    if let Some(file) = &cli.settings {
        config_ops::load_settings(file);
    }

    match cli.command {
        Command::CompileLexicon {
            lexicon,
            fst,
            isyms,
            osyms,
            policy,
            unknown_factor,
            word_break,
            ilabel_selfloops,
            disambig_lexicon,
        } => lexicon_ops::compile_lexicon(
            &lexicon,
            &lexicon_ops::CompileOutputs {
                fst: &fst,
                isyms: &isyms,
                osyms: &osyms,
                disambig_lexicon: disambig_lexicon.as_deref(),
            },
            &lexicon_ops::CompileOptions {
                policy,
                unknown_factor,
                word_break,
                selfloop_factor: ilabel_selfloops,
            },
        ),
        Command::CompileGrammar {
            rules,
            root,
            fst,
            isyms,
            osyms,
        } => grammar_ops::compile_grammar(&rules, &root, &fst, &isyms, &osyms),
        Command::RmDisambig {
            input,
            output,
            isyms,
        } => fst_ops::rm_disambig(&input, &output, &isyms),
        Command::RmDisambigSyms { syms } => fst_ops::rm_disambig_syms(&syms),
        Command::AddSelfloop {
            input,
            output,
            isyms,
            osyms,
            isymbol,
            osymbol,
            weight,
        } => fst_ops::add_selfloop(
            &input,
            &output,
            &isyms,
            &osyms,
            &fst_ops::SelfLoop {
                isymbol: &isymbol,
                osymbol: &osymbol,
                weight,
            },
        ),
        Command::ToJson {
            input,
            output,
            symbols,
        } => fst_ops::to_json(&input, &output, symbol_paths(&symbols)),
        Command::ToBin {
            input,
            output,
            symbols,
        } => fst_ops::to_bin(&input, &output, symbol_paths(&symbols)),
        Command::Info { input, symbols } => fst_ops::info(&input, symbol_paths(&symbols)),
        Command::Decode {
            fst,
            input,
            symbols,
            beam,
        } => decode_ops::decode_cmd(&fst, symbol_paths(&symbols), &input, beam),
        Command::Segment {
            fst,
            text,
            symbols,
            beam,
        } => decode_ops::segment_cmd(&fst, symbol_paths(&symbols), &text, beam),
        Command::Convert {
            fst,
            text,
            symbols,
            beam,
        } => decode_ops::convert_cmd(&fst, symbol_paths(&symbols), &text, beam),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}

fn symbol_paths(args: &SymbolArgs) -> Option<lexfst_cli::commands::TextSymbols<'_>> {
    text_symbols(args.isyms.as_deref(), args.osyms.as_deref())
}
