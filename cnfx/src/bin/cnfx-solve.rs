//! DIMACS front end over an in-process CDCL solver.
//!
//! Prints a SAT-competition transcript: `s SATISFIABLE` followed by a `v`
//! line assigning every declared variable (exit status 10), or
//! `s UNSATISFIABLE` (exit status 20).

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use cnfx::{DimacsCnf, Lit};
use cnfx_core::config::{EXIT_SATISFIABLE, EXIT_UNSATISFIABLE};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;
use varisat::{ExtendFormula, Lit as SatLit, Solver};

#[derive(Parser, Debug)]
#[command(name = "cnfx-solve")]
#[command(version)]
#[command(about = "Solve a DIMACS CNF file and print the model")]
struct Args {
    /// DIMACS CNF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress comment lines in the transcript
    #[arg(short, long)]
    quiet: bool,
}

fn run(args: &Args) -> Result<i32> {
    let file = File::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let cnf = DimacsCnf::parse(BufReader::new(file))
        .with_context(|| format!("cannot parse {}", args.input.display()))?;
    info!(
        vars = cnf.num_vars,
        clauses = cnf.clauses.len(),
        "loaded problem"
    );

    let mut solver = Solver::new();
    for clause in &cnf.clauses {
        let lits: Vec<SatLit> = clause
            .iter()
            .map(|lit| SatLit::from_dimacs(lit.to_dimacs() as isize))
            .collect();
        solver.add_clause(&lits);
    }
    let satisfiable = solver
        .solve()
        .map_err(|e| anyhow::anyhow!("solver failed: {e}"))?;
    debug!(satisfiable, "search finished");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.quiet {
        writeln!(
            out,
            "c cnfx-solve: {} variables, {} clauses",
            cnf.num_vars,
            cnf.clauses.len()
        )?;
    }

    if !satisfiable {
        DimacsCnf::write_unsat(&mut out)?;
        return Ok(EXIT_UNSATISFIABLE);
    }

    // Variables absent from every clause are reported false.
    let mut values = vec![false; cnf.num_vars as usize + 1];
    for lit in solver.model().unwrap_or_default() {
        if let Some(slot) = values.get_mut(lit.index() + 1) {
            *slot = lit.is_positive();
        }
    }
    let assignment: Vec<Lit> = (1..=cnf.num_vars)
        .map(|var| Lit::with_polarity(var, values[var as usize]))
        .collect();
    DimacsCnf::write_sat_assignment(&assignment, &mut out)?;
    Ok(EXIT_SATISFIABLE)
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        std::process::exit(1);
    }

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("cnfx-solve: {e:#}");
            std::process::exit(1);
        }
    }
}
