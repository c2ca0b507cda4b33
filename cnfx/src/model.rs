//! Parsing solver models.
//!
//! A model arrives as one or more lines starting with `v`, each holding
//! signed DIMACS literals; the sequence ends at a `0`. Every irregularity
//! is an error, because decoding a partially understood model would
//! report values the solver never produced.

use cnfx_core::{CnfxError, Lit, Result, Var};
use rustc_hash::FxHashMap;

/// A complete truth assignment reported by a solver.
#[derive(Debug, Clone, Default)]
pub struct Model {
    literals: Vec<Lit>,
    values: FxHashMap<Var, bool>,
}

/// Payload of a `v` line, or `None` for any other line.
fn model_payload(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('v')?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest)
    } else {
        None
    }
}

impl Model {
    /// Build a model from literals, rejecting duplicates, conflicts and
    /// variables above `num_vars`.
    pub fn from_literals(literals: impl IntoIterator<Item = Lit>, num_vars: u32) -> Result<Self> {
        let mut model = Self::default();
        for lit in literals {
            model.insert(lit, num_vars)?;
        }
        Ok(model)
    }

    fn insert(&mut self, lit: Lit, num_vars: u32) -> Result<()> {
        if lit.var() > num_vars {
            return Err(CnfxError::MalformedModel(format!(
                "literal {lit} exceeds the {num_vars} declared variables"
            )));
        }
        if let Some(previous) = self.values.insert(lit.var(), lit.is_positive()) {
            let kind = if previous == lit.is_positive() {
                "repeats"
            } else {
                "contradicts"
            };
            return Err(CnfxError::MalformedModel(format!(
                "literal {lit} {kind} an earlier assignment"
            )));
        }
        self.literals.push(lit);
        Ok(())
    }

    /// Parse the `v` lines of a solver transcript.
    ///
    /// Returns `Ok(None)` when no `v` line is present, which is how
    /// solvers report unsatisfiability.
    pub fn parse<'a, I>(lines: I, num_vars: u32) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut model = Self::default();
        let mut seen_line = false;
        let mut terminated = false;

        for line in lines {
            let Some(payload) = model_payload(line.trim_start()) else {
                continue;
            };
            seen_line = true;
            for token in payload.split_whitespace() {
                if terminated {
                    return Err(CnfxError::MalformedModel(format!(
                        "token `{token}` after the terminating 0"
                    )));
                }
                let value: i32 = token.parse().map_err(|_| {
                    CnfxError::MalformedModel(format!("`{token}` is not an integer literal"))
                })?;
                match Lit::from_dimacs(value) {
                    Some(lit) => model.insert(lit, num_vars)?,
                    None if value == 0 => terminated = true,
                    None => {
                        return Err(CnfxError::MalformedModel(format!(
                            "`{token}` is not a valid literal"
                        )));
                    }
                }
            }
        }

        Ok(seen_line.then_some(model))
    }

    /// Truth value of `lit`, if its variable is assigned.
    #[must_use]
    pub fn value(&self, lit: Lit) -> Option<bool> {
        self.values
            .get(&lit.var())
            .map(|&positive| positive == lit.is_positive())
    }

    /// Truth value of `lit`, failing when the solver left it out.
    pub fn require(&self, lit: Lit) -> Result<bool> {
        self.value(lit).ok_or_else(|| {
            CnfxError::MalformedModel(format!("variable {} missing from model", lit.var()))
        })
    }

    /// Assigned literals in the order the solver printed them.
    #[must_use]
    pub fn literals(&self) -> &[Lit] {
        &self.literals
    }

    /// Number of assigned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether no variable is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Clause excluding exactly this assignment.
    #[must_use]
    pub fn blocking_clause(&self) -> Vec<Lit> {
        self.literals.iter().map(|lit| lit.negate()).collect()
    }
}
