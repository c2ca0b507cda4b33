//! File-backed clause storage.
//!
//! Clause lines are streamed into the CNF file as they are generated.
//! The `p cnf` header is written on [`ClauseStore::finalize`] and rewritten
//! every time the totals change afterwards, so the file on disk is always
//! a valid DIMACS problem once finalized.

use crate::dimacs::{header_line, is_clause_line, write_clause};
use crate::error::{CnfxError, Result};
use crate::literal::{Lit, Var};
use crate::sink::{ClauseSink, check_clause};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Counters plus the clause body persisted at one path.
#[derive(Debug)]
pub struct ClauseStore {
    path: PathBuf,
    writer: BufWriter<File>,
    num_vars: u32,
    num_clauses: usize,
    finalized: bool,
    true_lit: Option<Lit>,
}

impl ClauseStore {
    /// Create (or truncate) the CNF file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        debug!(path = %path.display(), "created clause store");
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            num_vars: 0,
            num_clauses: 0,
            finalized: false,
            true_lit: None,
        })
    }

    /// Location of the CNF file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the header has been written.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Write the header for the first time; later calls only resync it.
    pub fn finalize(&mut self) -> Result<()> {
        self.rewrite_header()?;
        if !self.finalized {
            info!(
                vars = self.num_vars,
                clauses = self.num_clauses,
                path = %self.path.display(),
                "finalized CNF"
            );
        }
        self.finalized = true;
        Ok(())
    }

    /// Replace the header with the current totals.
    ///
    /// The clause lines in the file body are counted first and must match
    /// the clause counter.
    pub fn rewrite_header(&mut self) -> Result<()> {
        self.writer.flush()?;
        let contents = fs::read_to_string(&self.path)?;
        let body = if self.finalized {
            match contents.split_once('\n') {
                Some((first, rest)) if first.starts_with("p cnf") => rest,
                _ => {
                    return Err(CnfxError::Dimacs(format!(
                        "{} lost its problem line",
                        self.path.display()
                    )));
                }
            }
        } else {
            contents.as_str()
        };

        let found = body.lines().filter(|line| is_clause_line(line)).count();
        if found != self.num_clauses {
            return Err(CnfxError::ClauseCountMismatch {
                expected: self.num_clauses,
                found,
            });
        }

        let mut file = BufWriter::new(File::create(&self.path)?);
        writeln!(file, "{}", header_line(self.num_vars, self.num_clauses))?;
        file.write_all(body.as_bytes())?;
        file.flush()?;

        let appender = OpenOptions::new().append(true).open(&self.path)?;
        self.writer = BufWriter::new(appender);
        debug!(
            vars = self.num_vars,
            clauses = self.num_clauses,
            "rewrote CNF header"
        );
        Ok(())
    }

    /// Push buffered clause lines to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl ClauseSink for ClauseStore {
    fn new_var(&mut self) -> Var {
        self.num_vars += 1;
        self.num_vars
    }

    fn add_clause(&mut self, lits: &[Lit]) -> Result<()> {
        check_clause(lits, self.num_vars)?;
        write_clause(&mut self.writer, lits)?;
        self.num_clauses += 1;
        trace!(clause = self.num_clauses, len = lits.len(), "added clause");
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
        self.num_clauses
    }
}
