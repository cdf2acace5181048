mod text_io;

use super::{Fst, FstBuilder, FstWriter};
use crate::symbol::Symbol;

fn text(s: &str) -> Symbol {
    Symbol::Text(s.to_string())
}

/// `ab -> X`, `a -> Y`, plus an epsilon arc and a disambiguation arc.
fn sample_fst() -> Fst {
    let mut b = FstBuilder::new();
    let s1 = b.create_state();
    let s2 = b.create_state();
    let s3 = b.create_state();
    b.add_arc(0, s1, &text("a"), &text("X"), 1.5).unwrap();
    b.add_arc(s1, 0, &text("b"), &Symbol::Eps, 0.0).unwrap();
    b.add_arc(0, s2, &text("a"), &text("Y"), 2.0).unwrap();
    b.add_arc(s2, s3, &Symbol::Disambig(1), &Symbol::Eps, 0.0)
        .unwrap();
    b.add_arc(s3, 0, &Symbol::Eps, &text("<break>"), 0.25).unwrap();
    b.set_final(0, 0.0).unwrap();
    b.set_final(s3, 0.5).unwrap();
    b.finish().unwrap();
    b.build()
}

/// Arcs, final weights and both symbol dictionaries match.
fn assert_same_fst(a: &Fst, b: &Fst) {
    assert_eq!(a.labels(), b.labels());
    assert_eq!(a.final_states(), b.final_states());
    assert_eq!(a.isymbol_dict(), b.isymbol_dict());
    let osyms_a: Vec<_> = a.osymbols().iter().collect();
    let osyms_b: Vec<_> = b.osymbols().iter().collect();
    assert_eq!(osyms_a, osyms_b);
}
