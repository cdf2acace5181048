use crate::decoder::{DecodeError, Decoder};
use crate::fst::{Fst, FstBuilder, FstWriter};
use crate::symbol::Symbol;

fn text(s: &str) -> Symbol {
    Symbol::Text(s.to_string())
}

/// Single-state FST with a self-loop on `isym:osym`.
fn loop_fst(isym: Symbol, osym: Symbol) -> Fst {
    let mut b = FstBuilder::new();
    b.add_arc(0, 0, &text("a"), &text("a"), 0.0).unwrap();
    b.add_arc(0, 0, &isym, &osym, 1.0).unwrap();
    b.set_final(0, 0.0).unwrap();
    b.build()
}

#[test]
fn unexpected_special_output() {
    let fst = loop_fst(text("x"), text("<weird>"));
    let err = Decoder::with_beam_size(&fst, 4).decode(&["x"]).unwrap_err();
    assert_eq!(err, DecodeError::UnexpectedSymbol("<weird>".into()));

    let fst = loop_fst(text("x"), Symbol::Unk);
    let err = Decoder::with_beam_size(&fst, 4).decode(&["x"]).unwrap_err();
    assert_eq!(err, DecodeError::UnexpectedSymbol("<unk>".into()));
}

#[test]
fn capture_without_marker() {
    let fst = loop_fst(Symbol::Unk, Symbol::Eps);
    let err = Decoder::with_beam_size(&fst, 4).decode(&["z"]).unwrap_err();
    assert_eq!(err, DecodeError::CaptureMismatch { markers: 0, captures: 1 });
}

#[test]
fn marker_without_capture() {
    let fst = loop_fst(text("x"), text("<capture>"));
    let err = Decoder::with_beam_size(&fst, 4).decode(&["x"]).unwrap_err();
    assert_eq!(err, DecodeError::CaptureMismatch { markers: 1, captures: 0 });
}

#[test]
fn break_marker_passes_through() {
    let fst = loop_fst(text("x"), text("<break>"));
    let out = Decoder::with_beam_size(&fst, 4).decode(&["a", "x", "a"]).unwrap();
    assert_eq!(out, vec!["a", "<break>", "a"]);
}

#[test]
fn final_weight_added_to_cost() {
    // 0 -a:A-> 1 (final 5.0) and 0 -a:B-> 2 (final 0.0): B wins on final weight.
    let mut b = FstBuilder::new();
    let s1 = b.create_state();
    let s2 = b.create_state();
    b.add_arc(0, s1, &text("a"), &text("A"), 0.0).unwrap();
    b.add_arc(0, s2, &text("a"), &text("B"), 1.0).unwrap();
    b.set_final(s1, 5.0).unwrap();
    b.set_final(s2, 0.0).unwrap();
    let fst = b.build();
    assert_eq!(Decoder::with_beam_size(&fst, 4).decode(&["a"]).unwrap(), vec!["B"]);
}

#[test]
fn epsilon_chain_is_followed() {
    // 0 -a:A-> 1 -eps:B-> 2 -eps:C-> 0, only 0 final
    let mut b = FstBuilder::new();
    let s1 = b.create_state();
    let s2 = b.create_state();
    b.add_arc(0, s1, &text("a"), &text("A"), 0.0).unwrap();
    b.add_arc(s1, s2, &Symbol::Eps, &text("B"), 0.0).unwrap();
    b.add_arc(s2, 0, &Symbol::Eps, &text("C"), 0.0).unwrap();
    b.set_final(0, 0.0).unwrap();
    let fst = b.build();
    let out = Decoder::with_beam_size(&fst, 1).decode(&["a", "a"]).unwrap();
    assert_eq!(out, vec!["A", "B", "C", "A", "B", "C"]);
}
