use super::{entry, hi_hello, syms};
use crate::fst::{FstBuilder, TextFstWriter};
use crate::lexicon::{LexiconCompiler, LexiconEntry, LexiconError, UnknownPolicy};
use crate::symbol::Symbol;

fn compile_text(compiler: &LexiconCompiler, lexicon: &[LexiconEntry]) -> (String, String, String) {
    let (mut arcs, mut isyms, mut osyms) = (Vec::new(), Vec::new(), Vec::new());
    {
        let mut writer = TextFstWriter::new(&mut arcs, &mut isyms, &mut osyms);
        compiler.compile(lexicon, &mut writer).unwrap();
    }
    (
        String::from_utf8(arcs).unwrap(),
        String::from_utf8(isyms).unwrap(),
        String::from_utf8(osyms).unwrap(),
    )
}

#[test]
fn trie_text_output() {
    let compiler = LexiconCompiler::new(UnknownPolicy::Fail);
    let (arcs, isyms, osyms) = compile_text(&compiler, &hi_hello());
    assert_eq!(
        arcs,
        "0 1 2 2 -0.69\n\
         1 0 3 0 0\n\
         0 2 2 3 -0.36\n\
         2 3 4 0 0\n\
         3 4 5 0 0\n\
         4 5 5 0 0\n\
         5 0 6 0 0\n\
         0 0\n"
    );
    assert_eq!(isyms, "<eps> 0\n<unk> 1\nh 2\ni 3\ne 4\nl 5\no 6\n");
    assert_eq!(osyms, "<eps> 0\n<unk> 1\nhi 2\nhello 3\n");
}

#[test]
fn unknown_arc_per_policy() {
    let (arcs, _, osyms) = compile_text(&LexiconCompiler::new(UnknownPolicy::Output), &hi_hello());
    assert!(arcs.ends_with("0 0 1 4 1.613\n0 0\n"), "{arcs}");
    assert!(osyms.ends_with("<capture> 4\n"));

    let (arcs, _, osyms) = compile_text(&LexiconCompiler::new(UnknownPolicy::Ignore), &hi_hello());
    assert!(arcs.ends_with("0 0 1 4 1.613\n0 0\n"), "{arcs}");
    assert!(osyms.ends_with("<capture_eps> 4\n"));

    let (arcs, _, _) = compile_text(&LexiconCompiler::new(UnknownPolicy::Fail), &hi_hello());
    assert!(!arcs.lines().any(|l| l.split(' ').nth(2) == Some("1")));
}

#[test]
fn unknown_weight_uses_factor() {
    let compiler = LexiconCompiler::new(UnknownPolicy::Output);
    assert!((compiler.unknown_weight(0.0) - 2.303).abs() < 1e-6);
    let compiler = compiler.with_unknown_factor(0.5);
    assert!((compiler.unknown_weight(1.0) - 1.693).abs() < 1e-6);
}

#[test]
fn empty_lexicon_unknown_weight_from_zero() {
    let mut builder = FstBuilder::new();
    LexiconCompiler::new(UnknownPolicy::Output)
        .compile(&[], &mut builder)
        .unwrap();
    let fst = builder.build();
    let arcs = fst.arcs(0, &Symbol::Unk);
    assert_eq!(arcs.len(), 1);
    assert!((arcs[0].weight - 2.303).abs() < 1e-6);
    assert_eq!(fst.final_weight(0), Some(0.0));
}

#[test]
fn returns_disambiguated_lexicon() {
    let lexicon = vec![entry("fo", &["f", "o"], 0.0), entry("foo", &["f", "o", "o"], 0.0)];
    let mut builder = FstBuilder::new();
    let out = LexiconCompiler::new(UnknownPolicy::Fail)
        .compile(&lexicon, &mut builder)
        .unwrap();
    assert_eq!(out[0].symbols, syms(&["f", "o", "#1"]));
    assert_eq!(out[1].symbols, syms(&["f", "o", "o"]));
    let fst = builder.build();
    // f -> o -> #1 -> back to 0
    let s1 = fst.arcs(0, &Symbol::Text("f".into()))[0].dest;
    let s2 = fst.arcs(s1, &Symbol::Text("o".into()))[0].dest;
    assert_eq!(fst.arcs(s2, &Symbol::Disambig(1))[0].dest, 0);
}

#[test]
fn invalid_entries_rejected_before_writing() {
    let mut arcs = Vec::new();
    {
        let mut writer = TextFstWriter::new(&mut arcs, Vec::new(), Vec::new());
        let lexicon = vec![entry("ok", &["o"], 0.0), entry("", &["x"], 0.0)];
        let err = LexiconCompiler::new(UnknownPolicy::Fail)
            .compile(&lexicon, &mut writer)
            .unwrap_err();
        assert!(matches!(err, LexiconError::EmptyWord { index: 1 }));
    }
    assert!(arcs.is_empty());

    let mut builder = FstBuilder::new();
    let lexicon = vec![LexiconEntry::new("w", vec![], 0.0)];
    let err = LexiconCompiler::new(UnknownPolicy::Fail)
        .compile(&lexicon, &mut builder)
        .unwrap_err();
    assert!(matches!(err, LexiconError::EmptySymbols { index: 0, .. }));
}

#[test]
fn policy_parse() {
    assert_eq!("output".parse::<UnknownPolicy>().unwrap(), UnknownPolicy::Output);
    assert_eq!("ignore".parse::<UnknownPolicy>().unwrap(), UnknownPolicy::Ignore);
    assert_eq!("fail".parse::<UnknownPolicy>().unwrap(), UnknownPolicy::Fail);
    assert!(matches!(
        "drop".parse::<UnknownPolicy>(),
        Err(LexiconError::InvalidPolicy(p)) if p == "drop"
    ));
    assert_eq!(UnknownPolicy::Ignore.to_string(), "ignore");
}

#[test]
fn word_break_routes_through_break_arc() {
    let mut builder = FstBuilder::new();
    LexiconCompiler::new(UnknownPolicy::Output)
        .with_word_break(true)
        .compile(&[entry("a", &["a"], 0.0)], &mut builder)
        .unwrap();
    let fst = builder.build();
    let a = fst.arcs(0, &Symbol::Text("a".into()))[0];
    assert_ne!(a.dest, 0);
    let brk = fst.arcs(a.dest, &Symbol::Eps)[0];
    assert_eq!(brk.dest, 0);
    assert_eq!(fst.output_symbol(brk.olabel), Some(&Symbol::Text("<break>".into())));

    let unk = fst.arcs(0, &Symbol::Unk)[0];
    assert_ne!(unk.dest, 0);
    assert_eq!(fst.arcs(unk.dest, &Symbol::Eps)[0].dest, 0);
}
