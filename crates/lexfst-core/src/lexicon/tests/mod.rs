mod compiler;
mod io;

use super::LexiconEntry;
use crate::symbol::Symbol;

fn entry(word: &str, symbols: &[&str], weight: f32) -> LexiconEntry {
    LexiconEntry::from_labels(word, symbols, weight).unwrap()
}

fn hi_hello() -> Vec<LexiconEntry> {
    vec![
        entry("hi", &["h", "i"], -0.69),
        entry("hello", &["h", "e", "l", "l", "o"], -0.36),
    ]
}

fn syms(labels: &[&str]) -> Vec<Symbol> {
    labels.iter().map(|l| Symbol::from_encoded(l).unwrap()).collect()
}
