use std::collections::{HashMap, HashSet};

use super::LexiconEntry;
use crate::symbol::Symbol;

/// Append `#k` markers so that no entry's symbol sequence equals or is a
/// proper prefix of another's.
///
/// A sequence that is a prefix of some other entry, or that occurs more
/// than once, gets `#1` on its first occurrence and `#2`, `#3`, ... on each
/// repeat. The counter is kept per exact sequence. Unique, non-prefix
/// sequences are left alone.
pub fn add_disambig(lexicon: &[LexiconEntry]) -> Vec<LexiconEntry> {
    let mut prefixes: HashSet<&[Symbol]> = HashSet::new();
    let mut seen: HashSet<&[Symbol]> = HashSet::new();
    let mut ambiguous: HashSet<&[Symbol]> = HashSet::new();
    for entry in lexicon {
        let symbols = entry.symbols.as_slice();
        for end in 1..symbols.len() {
            prefixes.insert(&symbols[..end]);
        }
        if !seen.insert(symbols) {
            ambiguous.insert(symbols);
        }
    }

    let mut counters: HashMap<&[Symbol], u32> = HashMap::new();
    lexicon
        .iter()
        .map(|entry| {
            let key = entry.symbols.as_slice();
            let mut symbols = entry.symbols.clone();
            if let Some(k) = counters.get_mut(key) {
                *k += 1;
                symbols.push(Symbol::Disambig(*k));
            } else if prefixes.contains(key) || ambiguous.contains(key) {
                counters.insert(key, 1);
                symbols.push(Symbol::Disambig(1));
            } else {
                counters.insert(key, 0);
            }
            LexiconEntry {
                word: entry.word.clone(),
                symbols,
                weight: entry.weight,
            }
        })
        .collect()
}
