//! In-process solving for encoder tests.

use crate::encoder::Encoder;
use crate::model::Model;
use cnfx_core::{ClauseSink, Lit, MemorySink};
use varisat::{ExtendFormula, Lit as SatLit, Solver};

fn to_sat(lit: Lit) -> SatLit {
    SatLit::from_dimacs(lit.to_dimacs() as isize)
}

fn load(sink: &MemorySink) -> Solver<'static> {
    let mut solver = Solver::new();
    for clause in sink.clauses() {
        let lits: Vec<SatLit> = clause.iter().map(|&lit| to_sat(lit)).collect();
        solver.add_clause(&lits);
    }
    solver
}

/// Solve once more and decode; variables the solver never saw are false.
fn next_model(solver: &mut Solver<'static>, num_vars: u32) -> Option<Model> {
    if !solver.solve().unwrap() {
        return None;
    }
    let mut values = vec![false; num_vars as usize + 1];
    for lit in solver.model().unwrap() {
        if let Some(slot) = values.get_mut(lit.index() + 1) {
            *slot = lit.is_positive();
        }
    }
    let literals = (1..=num_vars).map(|var| Lit::with_polarity(var, values[var as usize]));
    Some(Model::from_literals(literals, num_vars).unwrap())
}

/// Solve the encoder's clauses and decode the first model.
pub fn solve(enc: &mut Encoder<MemorySink>) -> bool {
    let num_vars = enc.sink().num_vars();
    let mut solver = load(enc.sink());
    match next_model(&mut solver, num_vars) {
        Some(model) => {
            enc.apply_model(&model).unwrap();
            true
        }
        None => false,
    }
}

/// Collect `probe` over every model, blocking each one in turn.
pub fn enumerate<T>(
    enc: &mut Encoder<MemorySink>,
    probe: impl Fn(&Encoder<MemorySink>) -> T,
) -> Vec<T> {
    let num_vars = enc.sink().num_vars();
    let mut solver = load(enc.sink());
    let mut seen = Vec::new();
    while let Some(model) = next_model(&mut solver, num_vars) {
        enc.apply_model(&model).unwrap();
        seen.push(probe(enc));
        let blocking: Vec<SatLit> = model.blocking_clause().into_iter().map(to_sat).collect();
        solver.add_clause(&blocking);
        assert!(seen.len() <= 1 << 12, "runaway enumeration");
    }
    seen
}
