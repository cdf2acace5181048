use super::{assert_same_fst, sample_fst, text};
use crate::fst::{
    add_final_selfloops, strip_disambig_text, Fst, FstError, FstWriter, SymbolTable, TextFstWriter,
};
use crate::symbol::Symbol;

const ISYMS: &str = "<eps> 0\n<unk> 1\nh 2\ni 3\n#1 10000001\n";
const OSYMS: &str = "<eps> 0\n<unk> 1\nhi 2\n";

fn load(arcs: &str) -> Result<Fst, FstError> {
    Fst::from_text(ISYMS.as_bytes(), OSYMS.as_bytes(), arcs.as_bytes())
}

#[test]
fn load_arcs_and_finals() {
    let fst = load("0 1 2 2 -0.69\n1 2 3 0\n\n2 0 10000001 0\n0\n2 1.5\n").unwrap();
    let arcs = fst.arcs(0, &text("h"));
    assert_eq!(arcs.len(), 1);
    assert_eq!(arcs[0].dest, 1);
    assert_eq!(arcs[0].weight, -0.69);
    assert_eq!(fst.output_symbol(arcs[0].olabel), Some(&text("hi")));
    // weight defaults to zero
    assert_eq!(fst.arcs(1, &text("i"))[0].weight, 0.0);
    assert_eq!(fst.arcs(2, &Symbol::Disambig(1)).len(), 1);
    assert_eq!(fst.final_weight(0), Some(0.0));
    assert_eq!(fst.final_weight(2), Some(1.5));
    assert_eq!(fst.final_weight(1), None);
    assert!(fst.arcs(0, &text("x")).is_empty());
    assert!(fst.arcs(42, &text("h")).is_empty());
    assert_eq!(fst.input_id("#1"), Some(10_000_001));
}

#[test]
fn load_reports_line_numbers() {
    assert!(matches!(load("0 1 2\n"), Err(FstError::Parse { line: 1, .. })));
    assert!(matches!(load("0 1 2 2 0\n0 x\n"), Err(FstError::Parse { line: 2, .. })));
    assert!(matches!(load("0 1 9 2\n"), Err(FstError::Parse { line: 1, .. })));
    assert!(matches!(load("\n0 1 2 7\n"), Err(FstError::Parse { line: 2, .. })));
}

#[test]
fn load_rejects_disambig_output() {
    let osyms = "<eps> 0\n<unk> 1\n#1 10000001\n";
    let err = Fst::from_text(ISYMS.as_bytes(), osyms.as_bytes(), "0 0 2 10000001\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, FstError::DisambigOutput(_)));
}

#[test]
fn load_validates_symbol_tables() {
    let no_unk = "<eps> 0\nh 2\n";
    assert!(Fst::from_text(no_unk.as_bytes(), OSYMS.as_bytes(), "0\n".as_bytes()).is_err());
}

#[test]
fn writer_output_reloads() {
    let fst = sample_fst();
    let (mut arcs, mut isyms, mut osyms) = (Vec::new(), Vec::new(), Vec::new());
    {
        let mut w = TextFstWriter::new(&mut arcs, &mut isyms, &mut osyms);
        for (state, label, list) in fst.labels() {
            let isym = Symbol::from_encoded(label).unwrap();
            for arc in list {
                let osym = fst.output_symbol(arc.olabel).unwrap().clone();
                w.add_arc(state, arc.dest, &isym, &osym, arc.weight).unwrap();
            }
        }
        for (state, weight) in fst.final_states() {
            w.set_final(state, weight).unwrap();
        }
        w.finish().unwrap();
    }
    let loaded = Fst::from_text(isyms.as_slice(), osyms.as_slice(), arcs.as_slice()).unwrap();
    assert_eq!(loaded.labels().len(), fst.labels().len());
    assert_eq!(loaded.final_states(), fst.final_states());
    let a = loaded.arcs(0, &text("a"));
    let outs: Vec<_> = a.iter().map(|arc| loaded.output_symbol(arc.olabel).unwrap().clone()).collect();
    assert_eq!(outs, vec![text("X"), text("Y")]);
}

#[test]
fn without_disambig_turns_markers_into_epsilon() {
    let fst = sample_fst();
    let stripped = fst.without_disambig();
    assert!(stripped.arcs(2, &Symbol::Disambig(1)).is_empty());
    assert_eq!(stripped.arcs(2, &Symbol::Eps).len(), 1);
    assert_eq!(stripped.input_id("#1"), None);
    // original untouched
    assert_eq!(fst.arcs(2, &Symbol::Disambig(1)).len(), 1);
    assert_eq!(fst.input_id("#1"), Some(10_000_001));
    assert_same_fst(&fst, &fst.clone());
}

#[test]
fn stats_counts() {
    let stats = sample_fst().stats();
    assert_eq!(stats.states, 4);
    assert_eq!(stats.arcs, 5);
    assert_eq!(stats.epsilon_arcs, 1);
    assert_eq!(stats.final_states, 2);
}

#[test]
fn strip_disambig_rewrites_ilabels() {
    let isyms = SymbolTable::read_text(ISYMS.as_bytes()).unwrap();
    let input = "0 1 2 2 0.5\n1 0 10000001 0\n0\n";
    let mut out = Vec::new();
    let n = strip_disambig_text(input.as_bytes(), &mut out, &isyms).unwrap();
    assert_eq!(n, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "0 1 2 2 0.5\n1 0 0 0\n0\n");
}

#[test]
fn final_selfloops_appended() {
    let input = "0 1 2 2 0.5\n1 0 3 0\n2 0.5\n0\n";
    let mut out = Vec::new();
    let n = add_final_selfloops(input.as_bytes(), &mut out, 1, 3, 2.5).unwrap();
    assert_eq!(n, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "0 1 2 2 0.5\n1 0 3 0\n2 0.5\n0\n0 0 1 3 2.5\n2 0 1 3 2.5\n"
    );
}
