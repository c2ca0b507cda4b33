//! cnfx Core - literals, clause storage and the complex-base numeral codec
//!
//! This crate provides the foundation shared by the cnfx circuit builders
//! and encoder:
//! - DIMACS-numbered [`Lit`]erals and variables
//! - The [`ClauseSink`] seam with an in-memory [`MemorySink`] and a
//!   file-backed [`ClauseStore`]
//! - DIMACS reading and writing
//! - The [`NumeralCodec`] mapping reals to base `-1+i` digit blocks
//!
//! # Examples
//!
//! ```
//! use cnfx_core::{EncoderConfig, NumeralCodec};
//!
//! let codec = NumeralCodec::new(EncoderConfig::new(3)).unwrap();
//! let bits = codec.encode(-7.0).unwrap();
//! assert_eq!(bits.len(), 12);
//! assert_eq!(codec.decode(&bits).re, -7.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod dimacs;
pub mod error;
pub mod literal;
pub mod numeral;
pub mod sink;
pub mod store;

pub use config::{BITS_PER_DIGIT, EncoderConfig, MAX_TOTAL_DIGITS, SolverConfig};
pub use dimacs::DimacsCnf;
pub use error::{CnfxError, Result};
pub use literal::{Clause, Lit, Var};
pub use numeral::NumeralCodec;
pub use sink::{ClauseSink, MemorySink};
pub use store::ClauseStore;
