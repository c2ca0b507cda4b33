//! Boolean variables and literals in DIMACS numbering.
//!
//! Variables are numbered from 1 as in DIMACS; a literal is the signed
//! variable id, so it can be written to a clause line without translation.

use smallvec::SmallVec;
use std::fmt;
use std::ops::Not;

/// A Boolean variable identifier (1-based).
pub type Var = u32;

/// Inline storage for one clause; gate clauses never exceed four literals.
pub type Clause = SmallVec<[Lit; 4]>;

/// A literal (signed Boolean variable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Create a positive literal from a variable.
    #[must_use]
    pub const fn positive(var: Var) -> Self {
        Self(var as i32)
    }

    /// Create a negative literal from a variable.
    #[must_use]
    pub const fn negative(var: Var) -> Self {
        Self(-(var as i32))
    }

    /// Create a literal of the given polarity.
    #[must_use]
    pub const fn with_polarity(var: Var, positive: bool) -> Self {
        if positive {
            Self::positive(var)
        } else {
            Self::negative(var)
        }
    }

    /// Parse a DIMACS integer; zero is the clause terminator, not a literal.
    #[must_use]
    pub const fn from_dimacs(value: i32) -> Option<Self> {
        if value == 0 || value == i32::MIN {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Get the variable of this literal.
    #[must_use]
    pub const fn var(self) -> Var {
        self.0.unsigned_abs()
    }

    /// Check if this literal is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if this literal is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Get the negation of this literal.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self(-self.0)
    }

    /// The signed DIMACS form.
    #[must_use]
    pub const fn to_dimacs(self) -> i32 {
        self.0
    }
}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self {
        self.negate()
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
