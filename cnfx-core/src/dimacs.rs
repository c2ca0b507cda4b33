//! DIMACS CNF format parser and writer
//!
//! DIMACS is the plain-text clause format consumed by SAT solvers:
//! - Comments start with 'c'
//! - Problem line: "p cnf <num_vars> <num_clauses>"
//! - Clauses: space-separated literals ending with 0
//! - Literals: positive integers for positive literals, negative for negated
//!
//! Solver transcripts use `s SATISFIABLE` / `s UNSATISFIABLE` status lines
//! and `v` lines carrying the model.

use crate::error::{CnfxError, Result};
use crate::literal::{Clause, Lit};
use std::io::{BufRead, Write};

/// Format the problem line.
#[must_use]
pub fn header_line(num_vars: u32, num_clauses: usize) -> String {
    format!("p cnf {num_vars} {num_clauses}")
}

/// Write one clause line terminated by `0`.
pub fn write_clause<W: Write>(mut writer: W, clause: &[Lit]) -> std::io::Result<()> {
    for lit in clause {
        write!(writer, "{lit} ")?;
    }
    writeln!(writer, "0")
}

/// Whether a body line holds a clause (as opposed to a comment or header).
#[must_use]
pub fn is_clause_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('c') && !trimmed.starts_with('p')
}

/// Represents a DIMACS CNF problem
#[derive(Debug, Clone, Default)]
pub struct DimacsCnf {
    /// Number of variables
    pub num_vars: u32,
    /// Clauses
    pub clauses: Vec<Clause>,
    /// Comments from the file
    pub comments: Vec<String>,
}

impl DimacsCnf {
    /// Create a new empty DIMACS CNF problem
    #[must_use]
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Parse DIMACS CNF from a reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut num_vars = 0u32;
        let mut num_clauses_expected = 0usize;
        let mut clauses = Vec::new();
        let mut comments = Vec::new();
        let mut problem_line_found = false;
        // Clauses may wrap across lines; literals accumulate until a 0.
        let mut pending = Clause::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            if let Some(stripped) = trimmed.strip_prefix('c') {
                comments.push(stripped.trim().to_string());
                continue;
            }

            if trimmed.starts_with('p') {
                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                if problem_line_found || parts.len() != 4 || parts[1] != "cnf" {
                    return Err(CnfxError::Dimacs(format!("invalid problem line: {trimmed}")));
                }
                num_vars = parts[2].parse().map_err(|_| {
                    CnfxError::Dimacs(format!("invalid number of variables: {}", parts[2]))
                })?;
                num_clauses_expected = parts[3].parse().map_err(|_| {
                    CnfxError::Dimacs(format!("invalid number of clauses: {}", parts[3]))
                })?;
                problem_line_found = true;
                continue;
            }

            if !problem_line_found {
                return Err(CnfxError::Dimacs(
                    "clause found before problem line".to_string(),
                ));
            }

            for token in trimmed.split_whitespace() {
                let value: i32 = token
                    .parse()
                    .map_err(|_| CnfxError::Dimacs(format!("invalid literal: {token}")))?;
                match Lit::from_dimacs(value) {
                    None if value == 0 => clauses.push(std::mem::take(&mut pending)),
                    None => {
                        return Err(CnfxError::Dimacs(format!("invalid literal: {token}")));
                    }
                    Some(lit) if lit.var() > num_vars => {
                        return Err(CnfxError::Dimacs(format!(
                            "literal {lit} refers to variable {}, but only {num_vars} variables declared",
                            lit.var()
                        )));
                    }
                    Some(lit) => pending.push(lit),
                }
            }
        }

        if !problem_line_found {
            return Err(CnfxError::Dimacs("no problem line found".to_string()));
        }
        if !pending.is_empty() {
            clauses.push(pending);
        }
        if clauses.len() != num_clauses_expected {
            return Err(CnfxError::Dimacs(format!(
                "expected {num_clauses_expected} clauses but found {}",
                clauses.len()
            )));
        }

        Ok(Self {
            num_vars,
            clauses,
            comments,
        })
    }

    /// Write DIMACS CNF to a writer
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        for comment in &self.comments {
            writeln!(writer, "c {comment}")?;
        }
        writeln!(writer, "{}", header_line(self.num_vars, self.clauses.len()))?;
        for clause in &self.clauses {
            write_clause(&mut writer, clause)?;
        }
        Ok(())
    }

    /// Write a satisfying assignment as a solver transcript
    pub fn write_sat_assignment<W: Write>(assignment: &[Lit], mut writer: W) -> Result<()> {
        writeln!(writer, "s SATISFIABLE")?;
        write!(writer, "v ")?;
        for lit in assignment {
            write!(writer, "{lit} ")?;
        }
        writeln!(writer, "0")?;
        Ok(())
    }

    /// Write an unsatisfiable verdict as a solver transcript
    pub fn write_unsat<W: Write>(mut writer: W) -> Result<()> {
        writeln!(writer, "s UNSATISFIABLE")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;
    use std::io::Cursor;

    #[test]
    fn test_parse_simple_dimacs() {
        let input = "c Simple SAT problem\np cnf 3 2\n1 -2 0\n2 3 -1 0\n";
        let cnf = DimacsCnf::parse(Cursor::new(input)).unwrap();

        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.clauses.len(), 2);
        assert_eq!(
            cnf.clauses[0].as_slice(),
            &[Lit::positive(1), Lit::negative(2)]
        );
        assert_eq!(cnf.clauses[1].len(), 3);
        assert_eq!(cnf.comments, vec!["Simple SAT problem".to_string()]);
    }

    #[test]
    fn test_parse_wrapped_clause() {
        let input = "p cnf 3 1\n1 -2\n3 0\n";
        let cnf = DimacsCnf::parse(Cursor::new(input)).unwrap();
        assert_eq!(cnf.clauses.len(), 1);
        assert_eq!(cnf.clauses[0].len(), 3);
    }

    #[test]
    fn test_write_dimacs() {
        let mut cnf = DimacsCnf::new(2);
        cnf.clauses.push(smallvec![Lit::positive(1), Lit::negative(2)]);
        cnf.clauses.push(smallvec![Lit::positive(2)]);
        cnf.comments.push("Test problem".to_string());

        let mut output = Vec::new();
        cnf.write(&mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "c Test problem\np cnf 2 2\n1 -2 0\n2 0\n");
    }

    #[test]
    fn test_invalid_dimacs() {
        // Missing problem line
        assert!(DimacsCnf::parse(Cursor::new("1 -2 0\n")).is_err());
        // Invalid variable number
        assert!(DimacsCnf::parse(Cursor::new("p cnf 2 1\n1 -3 0\n")).is_err());
        // Wrong number of clauses
        assert!(DimacsCnf::parse(Cursor::new("p cnf 2 2\n1 -2 0\n")).is_err());
        // Not a CNF problem
        assert!(DimacsCnf::parse(Cursor::new("p sat 2 1\n1 0\n")).is_err());
    }

    #[test]
    fn test_transcripts() {
        let mut out = Vec::new();
        DimacsCnf::write_sat_assignment(&[Lit::positive(1), Lit::negative(2)], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "s SATISFIABLE\nv 1 -2 0\n");

        let mut out = Vec::new();
        DimacsCnf::write_unsat(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "s UNSATISFIABLE\n");
    }

    #[test]
    fn test_clause_line_helpers() {
        assert_eq!(header_line(7, 3), "p cnf 7 3");
        assert!(is_clause_line("1 -2 0"));
        assert!(!is_clause_line("c comment"));
        assert!(!is_clause_line("p cnf 1 1"));
        assert!(!is_clause_line("   "));
    }
}
