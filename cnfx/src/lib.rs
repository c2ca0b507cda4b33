//! cnfx - compile arithmetic constraints to CNF and enumerate their models
//!
//! Values are blocks of Boolean variables holding base-4 digits in the
//! complex base `-1+i`. Arithmetic, bitwise operations and comparisons on
//! values lower to Tseitin circuits written to a DIMACS file; an external
//! SAT solver finds assignments, which are decoded back into numbers and
//! then blocked so that repeated solving enumerates every model.
//!
//! # Examples
//!
//! ```no_run
//! use cnfx::{Encoder, SolverConfig};
//!
//! let mut enc = Encoder::integer(3, "problem.cnf")?;
//! let x = enc.free_value()?;
//! let y = enc.free_value()?;
//! let sum = enc.add(x, y)?;
//! enc.assert_equal(sum, 7)?;
//! enc.assert_not_equal(x, y)?;
//!
//! let solver = SolverConfig::new("cnfx-solve");
//! while enc.solve_next(&solver)? {
//!     println!("x = {:?}, y = {:?}", enc.value(x), enc.value(y));
//! }
//! # Ok::<(), cnfx::CnfxError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod encoder;
pub mod model;
pub mod relation;
pub mod solve;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use cnfx_circuits::{ArithmeticCircuits, BinaryGate, GateLibrary};
pub use cnfx_core::{
    ClauseSink, ClauseStore, CnfxError, DimacsCnf, EncoderConfig, Lit, MemorySink, NumeralCodec,
    Result, SolverConfig, Var,
};
pub use encoder::Encoder;
pub use model::Model;
pub use solve::{model_log_path, run_solver};
pub use value::{Operand, SymbolicValue, ValueId, ValueKind};
