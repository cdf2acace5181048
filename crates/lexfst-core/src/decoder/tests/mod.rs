mod errors;

use crate::fst::{Fst, FstBuilder};
use crate::lexicon::{LexiconCompiler, LexiconEntry, UnknownPolicy};

fn entry(word: &str, symbols: &[&str], weight: f32) -> LexiconEntry {
    LexiconEntry::from_labels(word, symbols, weight).unwrap()
}

fn hi_hello() -> Vec<LexiconEntry> {
    vec![
        entry("hi", &["h", "i"], -0.69),
        entry("hello", &["h", "e", "l", "l", "o"], -0.36),
    ]
}

/// Compile into memory and strip disambiguation markers, standing in for
/// the determinize/minimize round trip through a toolkit.
fn compile(lexicon: &[LexiconEntry], policy: UnknownPolicy) -> Fst {
    let mut builder = FstBuilder::new();
    LexiconCompiler::new(policy)
        .compile(lexicon, &mut builder)
        .unwrap();
    builder.build().without_disambig()
}

fn chars(s: &str) -> Vec<String> {
    s.chars().map(String::from).collect()
}
