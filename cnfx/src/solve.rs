//! Driving an external SAT solver over the persisted CNF.
//!
//! Each call to [`Encoder::solve_next`] syncs the DIMACS header, runs the
//! solver on the file, records its standard output in a sibling `.mod`
//! file, decodes every registered value from the reported model and then
//! blocks that model so the next call finds a different one.

use crate::encoder::Encoder;
use crate::model::Model;
use cnfx_core::{ClauseSink, ClauseStore, CnfxError, Result, SolverConfig};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

/// Path of the solver transcript kept next to a CNF file.
#[must_use]
pub fn model_log_path(cnf: &Path) -> PathBuf {
    cnf.with_extension("mod")
}

fn unavailable(config: &SolverConfig, reason: impl Into<String>) -> CnfxError {
    CnfxError::SolverUnavailable {
        program: config.program.clone(),
        reason: reason.into(),
    }
}

/// Kill and reap a solver whose output could not be consumed.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "solver already exited");
    }
    if let Err(e) = child.wait() {
        warn!(error = %e, "could not reap solver");
    }
}

/// Copy the child's stdout into `transcript`, returning its lines.
fn capture(
    child: &mut Child,
    transcript: &mut BufWriter<File>,
    config: &SolverConfig,
) -> Result<Vec<String>> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| unavailable(config, "standard output was not captured"))?;
    let mut reader = BufReader::new(stdout);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        transcript.write_all(&buf)?;
        let line = String::from_utf8_lossy(&buf).trim_end().to_string();
        if config.echo {
            info!(target: "cnfx::solver", "{line}");
        }
        lines.push(line);
    }
    transcript.flush()?;
    Ok(lines)
}

/// Run the solver on `cnf`, copy its stdout verbatim into `log` and return
/// the lines it printed.
///
/// The child is always waited for before this returns.
pub fn run_solver(config: &SolverConfig, cnf: &Path, log: &Path) -> Result<Vec<String>> {
    let mut transcript = BufWriter::new(File::create(log)?);
    debug!(
        program = %config.program.display(),
        cnf = %cnf.display(),
        params = %config.params,
        "invoking solver"
    );
    let mut child = Command::new(&config.program)
        .arg(cnf)
        .args(config.arguments())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| unavailable(config, e.to_string()))?;

    let lines = match capture(&mut child, &mut transcript, config) {
        Ok(lines) => lines,
        Err(e) => {
            reap(&mut child);
            return Err(e);
        }
    };

    let status = child.wait()?;
    match status.code() {
        Some(code) if SolverConfig::is_normal_exit(code) => {
            debug!(code, "solver finished");
            Ok(lines)
        }
        _ => {
            warn!(%status, "solver terminated abnormally");
            Err(unavailable(config, format!("terminated with {status}")))
        }
    }
}

impl Encoder<ClauseStore> {
    /// Write the DIMACS header; repeated calls only resync the counts.
    pub fn finalize(&mut self) -> Result<()> {
        self.sink.finalize()
    }

    /// Search for the next model.
    ///
    /// Returns `Ok(true)` after decoding a model into every registered
    /// value and blocking it, `Ok(false)` once no further model exists.
    pub fn solve_next(&mut self, solver: &SolverConfig) -> Result<bool> {
        self.finalize()?;
        let cnf = self.sink.path().to_path_buf();
        let lines = run_solver(solver, &cnf, &model_log_path(&cnf))?;

        let num_vars = self.sink.num_vars();
        let Some(model) = Model::parse(lines.iter().map(String::as_str), num_vars)? else {
            info!("no further model");
            return Ok(false);
        };
        self.apply_model(&model)?;

        self.sink.add_clause(&model.blocking_clause())?;
        self.sink.rewrite_header()?;
        info!(
            assigned = model.len(),
            clauses = self.sink.num_clauses(),
            "found model"
        );
        Ok(true)
    }
}
