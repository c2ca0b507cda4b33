//! Destinations for generated clauses.
//!
//! Circuit builders only need fresh variables, a way to append clauses
//! and a shared pair of constant literals; [`ClauseSink`] is that seam.
//! [`MemorySink`] keeps everything in memory for in-process solving,
//! while [`crate::store::ClauseStore`] streams clauses to a DIMACS file.

use crate::dimacs::DimacsCnf;
use crate::error::{CnfxError, Result};
use crate::literal::{Clause, Lit, Var};

/// Variable allocation and clause emission.
pub trait ClauseSink {
    /// Allocate a fresh variable; ids start at 1 and are never reused.
    fn new_var(&mut self) -> Var;

    /// Append one clause (a disjunction of literals).
    fn add_clause(&mut self, lits: &[Lit]) -> Result<()>;

    /// The literal clamped true by [`ClauseSink::constant`], once allocated.
    fn true_lit(&self) -> Option<Lit>;

    /// Record the literal backing [`ClauseSink::constant`].
    fn set_true_lit(&mut self, lit: Lit);

    /// Variables allocated so far.
    fn num_vars(&self) -> u32;

    /// Clauses appended so far.
    fn num_clauses(&self) -> usize;

    /// A literal forced to the given truth value, shared by all callers.
    ///
    /// The first call allocates one variable and clamps it with a unit
    /// clause; later calls reuse it.
    fn constant(&mut self, value: bool) -> Result<Lit> {
        let lit = match self.true_lit() {
            Some(lit) => lit,
            None => {
                let lit = self.new_lit();
                self.add_clause(&[lit])?;
                self.set_true_lit(lit);
                lit
            }
        };
        Ok(if value { lit } else { lit.negate() })
    }

    /// Allocate a fresh variable and return its positive literal.
    fn new_lit(&mut self) -> Lit {
        Lit::positive(self.new_var())
    }

    /// Allocate `count` fresh literals.
    fn new_lits(&mut self, count: usize) -> Vec<Lit> {
        (0..count).map(|_| self.new_lit()).collect()
    }

    /// Force `lit` to `value` with a unit clause.
    fn clamp(&mut self, lit: Lit, value: bool) -> Result<()> {
        let unit = if value { lit } else { lit.negate() };
        self.add_clause(&[unit])
    }
}

/// Reject literals that refer to unallocated variables.
pub fn check_clause(lits: &[Lit], num_vars: u32) -> Result<()> {
    match lits.iter().find(|lit| lit.var() == 0 || lit.var() > num_vars) {
        Some(lit) => Err(CnfxError::config(format!(
            "literal {lit} refers to an unallocated variable (only {num_vars} allocated)"
        ))),
        None => Ok(()),
    }
}

/// In-memory clause collection.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    num_vars: u32,
    clauses: Vec<Clause>,
    true_lit: Option<Lit>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clauses appended so far.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Snapshot as a DIMACS problem.
    #[must_use]
    pub fn to_dimacs(&self) -> DimacsCnf {
        DimacsCnf {
            num_vars: self.num_vars,
            clauses: self.clauses.clone(),
            comments: Vec::new(),
        }
    }
}

impl ClauseSink for MemorySink {
    fn new_var(&mut self) -> Var {
        self.num_vars += 1;
        self.num_vars
    }

    fn add_clause(&mut self, lits: &[Lit]) -> Result<()> {
        check_clause(lits, self.num_vars)?;
        self.clauses.push(Clause::from_slice(lits));
        Ok(())
    }

    fn true_lit(&self) -> Option<Lit> {
        self.true_lit
    }

    fn set_true_lit(&mut self, lit: Lit) {
        self.true_lit = Some(lit);
    }

    fn num_vars(&self) -> u32 {
        self.num_vars
    }

    fn num_clauses(&self) -> usize {
        self.clauses.len()
    }
}
