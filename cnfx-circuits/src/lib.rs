//! cnfx Circuits - Tseitin gates and binary arithmetic over a clause sink
//!
//! [`GateLibrary`] and [`ArithmeticCircuits`] are extension traits
//! implemented for every [`cnfx_core::ClauseSink`], so the same builders
//! emit into an in-memory sink or straight into a DIMACS file.
//!
//! # Examples
//!
//! ```
//! use cnfx_circuits::ArithmeticCircuits;
//! use cnfx_core::{ClauseSink, MemorySink};
//!
//! let mut sink = MemorySink::new();
//! let a = sink.new_lits(4);
//! let b = sink.new_lits(4);
//! let sum = sink.ripple_carry_add(&a, &b, None).unwrap();
//! let same = sink.mk_equal(&a, &b).unwrap();
//! sink.clamp(same, false).unwrap();
//! assert_eq!(sum.sum.len(), 4);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod arith;
pub mod gates;

#[cfg(test)]
pub(crate) mod testing;

pub use arith::{AdderOutput, ArithmeticCircuits};
pub use gates::{BinaryGate, GateLibrary};
