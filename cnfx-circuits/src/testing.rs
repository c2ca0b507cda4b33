//! In-process model enumeration for circuit tests.

use cnfx_core::{ClauseSink, Lit, MemorySink};
use varisat::{ExtendFormula, Lit as SatLit, Solver};

fn load(sink: &MemorySink) -> Solver<'static> {
    let mut solver = Solver::new();
    for clause in sink.clauses() {
        let lits: Vec<SatLit> = clause
            .iter()
            .map(|lit| SatLit::from_dimacs(lit.to_dimacs() as isize))
            .collect();
        solver.add_clause(&lits);
    }
    solver
}

/// Every distinct assignment of `watched` that extends to a model, sorted.
pub fn all_models(sink: &MemorySink, watched: &[Lit]) -> Vec<Vec<bool>> {
    let mut solver = load(sink);
    let mut found = Vec::new();
    while solver.solve().unwrap() {
        let model = solver.model().unwrap();
        let mut values = vec![false; sink.num_vars() as usize + 1];
        for lit in model {
            if let Some(slot) = values.get_mut(lit.index() + 1) {
                *slot = lit.is_positive();
            }
        }
        let projection: Vec<bool> = watched
            .iter()
            .map(|w| values[w.var() as usize] == w.is_positive())
            .collect();
        let blocking: Vec<SatLit> = watched
            .iter()
            .zip(&projection)
            .map(|(w, &v)| {
                let lit = SatLit::from_dimacs(w.to_dimacs() as isize);
                if v { !lit } else { lit }
            })
            .collect();
        found.push(projection);
        if blocking.is_empty() {
            break;
        }
        solver.add_clause(&blocking);
    }
    found.sort();
    found
}

/// The single assignment of `watched`; panics unless exactly one exists.
pub fn unique_model(sink: &MemorySink, watched: &[Lit]) -> Vec<bool> {
    let mut models = all_models(sink, watched);
    assert_eq!(models.len(), 1, "expected a unique model, got {models:?}");
    models.remove(0)
}

/// All Boolean vectors of length `n`.
pub fn assignments(n: usize) -> Vec<Vec<bool>> {
    (0..1u32 << n)
        .map(|mask| (0..n).map(|i| mask >> i & 1 == 1).collect())
        .collect()
}

/// Unsigned value of a least-significant-first bit vector.
pub fn to_u64(bits: &[bool]) -> u64 {
    bits.iter()
        .rev()
        .fold(0, |acc, &bit| (acc << 1) | u64::from(bit))
}

/// Least-significant-first bits of `value`.
pub fn from_u64(value: u64, width: usize) -> Vec<bool> {
    (0..width).map(|i| value >> i & 1 == 1).collect()
}
