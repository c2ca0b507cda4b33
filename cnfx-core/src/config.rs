//! Encoder and solver configuration.

use crate::error::{CnfxError, Result};
use std::path::PathBuf;

/// Bits used to store one base-4 digit.
pub const BITS_PER_DIGIT: usize = 4;

/// Widest layout whose values decode exactly in an `f64` mantissa.
pub const MAX_TOTAL_DIGITS: usize = 26;

/// Digit layout shared by every value of one encoder.
///
/// A value holds `integer_digits` digits above the radix point and
/// `fractional_digits` below it. Fixed-point layouts use the same count
/// on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Digits above the radix point
    pub integer_digits: u32,
    /// Digits below the radix point (0 for integer-only encoders)
    pub fractional_digits: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            integer_digits: 3,
            fractional_digits: 0,
        }
    }
}

impl EncoderConfig {
    /// Integer-only layout with the given digit width.
    #[must_use]
    pub fn new(integer_digits: u32) -> Self {
        Self {
            integer_digits,
            fractional_digits: 0,
        }
    }

    /// Fixed-point layout with `digits` digits on each side of the radix point.
    #[must_use]
    pub fn fixed_point(digits: u32) -> Self {
        Self {
            integer_digits: digits,
            fractional_digits: digits,
        }
    }

    /// Set the integer digit count.
    #[must_use]
    pub fn with_integer_digits(mut self, digits: u32) -> Self {
        self.integer_digits = digits;
        self
    }

    /// Set the fractional digit count.
    #[must_use]
    pub fn with_fractional_digits(mut self, digits: u32) -> Self {
        self.fractional_digits = digits;
        self
    }

    /// Reject layouts the encoder cannot build circuits for.
    pub fn validate(&self) -> Result<()> {
        if self.integer_digits == 0 {
            return Err(CnfxError::config("digit width must be at least 1"));
        }
        if self.fractional_digits != 0 && self.fractional_digits != self.integer_digits {
            return Err(CnfxError::config(format!(
                "fractional digits must be 0 or {}, got {}",
                self.integer_digits, self.fractional_digits
            )));
        }
        if self.total_digits() > MAX_TOTAL_DIGITS {
            return Err(CnfxError::config(format!(
                "at most {MAX_TOTAL_DIGITS} digits per value are supported, got {}",
                self.total_digits()
            )));
        }
        Ok(())
    }

    /// Integer plus fractional digits.
    #[must_use]
    pub fn total_digits(&self) -> usize {
        (self.integer_digits + self.fractional_digits) as usize
    }

    /// Number of literals in every value block.
    #[must_use]
    pub fn block_len(&self) -> usize {
        self.total_digits() * BITS_PER_DIGIT
    }

    /// Whether fractional digits are present.
    #[must_use]
    pub fn is_fixed_point(&self) -> bool {
        self.fractional_digits > 0
    }
}

/// Exit status a SAT-competition solver uses for a satisfiable instance.
pub const EXIT_SATISFIABLE: i32 = 10;

/// Exit status a SAT-competition solver uses for an unsatisfiable instance.
pub const EXIT_UNSATISFIABLE: i32 = 20;

/// How to invoke the external solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Executable name or path
    pub program: PathBuf,
    /// Free-form parameter string passed after the CNF path.
    ///
    /// It is split on whitespace, so a single argument cannot contain a
    /// space; use [`SolverConfig::args`] for those.
    pub params: String,
    /// Arguments passed verbatim after `params`
    pub args: Vec<String>,
    /// Echo solver output through the log
    pub echo: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("cnfx-solve"),
            params: String::new(),
            args: Vec::new(),
            echo: false,
        }
    }
}

impl SolverConfig {
    /// Use the given solver executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Set the solver parameter string.
    #[must_use]
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }

    /// Append one argument that is passed through unsplit.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Whitespace-split `params` followed by the verbatim `args`.
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.params
            .split_whitespace()
            .chain(self.args.iter().map(String::as_str))
    }

    /// Enable or disable echoing solver output.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Whether an exit status is a normal solver outcome.
    #[must_use]
    pub fn is_normal_exit(code: i32) -> bool {
        matches!(code, 0 | EXIT_SATISFIABLE | EXIT_UNSATISFIABLE)
    }
}
