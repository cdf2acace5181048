use super::entry;
use crate::lexicon::{add_ilabel_selfloops, read_lexicon, read_lexicon_file, write_lexicon, LexiconError};
use crate::symbol::Symbol;

#[test]
fn read_entries() {
    let data = "hi 0.5 h i\n\nhello 1 h e l l o\n\\#0 1 \\<eps\\> #1\n";
    let lexicon = read_lexicon(data.as_bytes()).unwrap();
    assert_eq!(lexicon.len(), 3);
    assert_eq!(lexicon[0].word, "hi");
    assert!((lexicon[0].weight - 0.5f32.ln().abs()).abs() < 1e-6);
    assert_eq!(lexicon[1].weight, 0.0);
    assert_eq!(
        lexicon[2].symbols,
        vec![Symbol::Text("\\<eps\\>".into()), Symbol::Disambig(1)]
    );
}

#[test]
fn read_errors_carry_line_numbers() {
    for (data, line) in [
        ("hi 0.5 h i\nbad 0.5\n", 2),
        ("hi x h i\n", 1),
        ("\nhi 0 h i\n", 2),
        ("hi -1 h i\n", 1),
    ] {
        match read_lexicon(data.as_bytes()) {
            Err(LexiconError::Parse { line: l, .. }) => assert_eq!(l, line, "{data:?}"),
            other => panic!("expected parse error for {data:?}, got {other:?}"),
        }
    }
}

#[test]
fn write_then_read() {
    let lexicon = vec![entry("hi", &["h", "i", "#1"], 0.25), entry("x", &["x"], 2.0)];
    let mut buf = Vec::new();
    write_lexicon(&lexicon, &mut buf).unwrap();
    let text = String::from_utf8(buf.clone()).unwrap();
    assert!(text.starts_with("hi "));
    assert!(text.lines().next().unwrap().ends_with(" h i #1"));

    let back = read_lexicon(buf.as_slice()).unwrap();
    assert_eq!(back.len(), 2);
    for (a, b) in lexicon.iter().zip(&back) {
        assert_eq!(a.word, b.word);
        assert_eq!(a.symbols, b.symbols);
        assert!((a.weight - b.weight).abs() < 1e-5);
    }
}

#[test]
fn read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.txt");
    std::fs::write(&path, "南京 0.5 南 京\n").unwrap();
    let lexicon = read_lexicon_file(&path).unwrap();
    assert_eq!(lexicon[0].symbols.len(), 2);
    assert!(matches!(
        read_lexicon_file(&dir.path().join("missing.txt")),
        Err(LexiconError::Io(_))
    ));
}

#[test]
fn ilabel_selfloops_fill_missing_singles() {
    let lexicon = vec![
        entry("one", &["o", "n", "e"], 0.0),
        entry("two", &["t", "w", "o"], 0.0),
        entry("three", &["t", "h", "r", "e", "e"], 0.0),
        entry("n", &["n"], 0.0),
        entry("e", &["e"], 0.0),
        entry("w", &["w"], 0.0),
    ];
    let out = add_ilabel_selfloops(&lexicon, 0.1);
    assert_eq!(&out[..lexicon.len()], lexicon.as_slice());
    let added: Vec<(&str, f32)> = out[lexicon.len()..]
        .iter()
        .map(|e| (e.word.as_str(), e.weight))
        .collect();
    let w = -(0.1f64.ln()) as f32;
    assert_eq!(added, vec![("h", w), ("o", w), ("r", w), ("t", w)]);
    for e in &out[lexicon.len()..] {
        assert_eq!(e.symbols, vec![Symbol::Text(e.word.clone())]);
    }
}

#[test]
fn ilabel_selfloops_cost_more_than_worst_entry() {
    let lexicon = vec![
        entry("头发", &["頭", "髮"], 6.0),
        entry("发", &["發"], 1.5),
    ];
    let out = add_ilabel_selfloops(&lexicon, 0.1);
    let expected = (6.0 - 0.1f64.ln()) as f32;
    let added: Vec<(&str, f32)> = out[lexicon.len()..]
        .iter()
        .map(|e| (e.word.as_str(), e.weight))
        .collect();
    assert_eq!(added, vec![("頭", expected), ("髮", expected)]);
}
