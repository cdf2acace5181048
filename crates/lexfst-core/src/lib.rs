//! Weighted finite-state transducers for text processing.
//!
//! A lexicon is compiled into a trie-shaped [`fst::Fst`] by
//! [`lexicon::LexiconCompiler`] (or a rule grammar into a general one by
//! [`grammar::GrammarCompiler`]), optionally optimized by an external toolkit
//! through [`fst::algebra`], and then decoded with the beam search in
//! [`decoder`]. [`segmenter`] and [`converter`] are thin consumers of the
//! decoder output.

pub mod converter;
pub mod decoder;
pub mod fst;
pub mod grammar;
pub mod lexicon;
pub mod segmenter;
pub mod settings;
pub mod symbol;
