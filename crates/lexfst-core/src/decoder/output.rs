use super::beam::PathStep;
use super::DecodeError;
use crate::fst::Fst;
use crate::symbol::{is_special, unescape, Symbol, BRK_SYM, CAP_EPS_SYM, CAP_SYM};

/// Turn a best path into output strings.
pub(super) fn render<S: AsRef<str>>(
    fst: &Fst,
    path: &[PathStep],
    inputs: &[S],
) -> Result<Vec<String>, DecodeError> {
    let mut symbols = Vec::with_capacity(path.len());
    let mut markers = 0;
    for &(olabel, _) in path {
        let symbol = fst
            .output_symbol(olabel)
            .ok_or(DecodeError::DanglingOutput(olabel))?;
        if matches!(symbol, Symbol::Text(s) if s == CAP_SYM || s == CAP_EPS_SYM) {
            markers += 1;
        }
        symbols.push(symbol);
    }

    let captures: Vec<&str> = path
        .iter()
        .filter_map(|&(_, capture)| capture)
        .map(|pos| inputs[pos].as_ref())
        .collect();
    if markers != captures.len() {
        return Err(DecodeError::CaptureMismatch {
            markers,
            captures: captures.len(),
        });
    }

    let mut captures = captures.into_iter();
    let mut out = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        match symbol {
            Symbol::Eps | Symbol::Disambig(_) => {}
            Symbol::Unk => return Err(DecodeError::UnexpectedSymbol(symbol.to_string())),
            Symbol::Text(s) if s == CAP_SYM => {
                // counts were checked above
                if let Some(text) = captures.next() {
                    out.push(text.to_string());
                }
            }
            Symbol::Text(s) if s == CAP_EPS_SYM => {
                captures.next();
            }
            Symbol::Text(s) if s == BRK_SYM => out.push(s.clone()),
            Symbol::Text(s) if is_special(s) => {
                return Err(DecodeError::UnexpectedSymbol(s.clone()));
            }
            Symbol::Text(s) => out.push(unescape(s)),
        }
    }
    Ok(out)
}
