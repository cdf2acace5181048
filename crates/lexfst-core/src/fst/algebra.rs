//! Seam to an external FST toolkit.
//!
//! Determinization, minimization and epsilon removal are not implemented
//! here. Callers plug in a toolkit binding through these traits; every
//! operation returns a new [`Fst`] and leaves its input untouched.

use tracing::debug_span;

use super::{Fst, FstError};

pub trait Determinizer {
    fn determinize(&self, fst: &Fst) -> Result<Fst, FstError>;
}

pub trait Minimizer {
    fn minimize(&self, fst: &Fst) -> Result<Fst, FstError>;
}

pub trait EpsilonRemover {
    fn rm_epsilon(&self, fst: &Fst) -> Result<Fst, FstError>;
}

/// Standard post-compilation pipeline: determinize, minimize, then turn
/// the disambiguation arcs into epsilons. Epsilon removal runs last when
/// a remover is given.
pub fn optimize(
    fst: &Fst,
    determinizer: &dyn Determinizer,
    minimizer: &dyn Minimizer,
    epsilon_remover: Option<&dyn EpsilonRemover>,
) -> Result<Fst, FstError> {
    let _span = debug_span!("optimize").entered();
    let det = determinizer.determinize(fst)?;
    let min = minimizer.minimize(&det)?;
    let stripped = min.without_disambig();
    match epsilon_remover {
        Some(remover) => remover.rm_epsilon(&stripped),
        None => Ok(stripped),
    }
}
