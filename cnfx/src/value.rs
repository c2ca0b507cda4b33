//! Symbolic value handles and operands.

use cnfx_core::Lit;
use num_complex::Complex64;
use std::fmt;

/// Opaque handle to a value registered with an [`crate::Encoder`].
///
/// Handles remember which encoder issued them; any other encoder rejects
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueId {
    pub(crate) owner: u32,
    pub(crate) index: usize,
}

impl ValueId {
    pub(crate) const fn new(owner: u32, index: usize) -> Self {
        Self { owner, index }
    }

    /// Position in creation order.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// How a value came to exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// Unconstrained apart from digit well-formedness
    Free,
    /// Clamped to an encoded constant
    Constant(f64),
    /// Output of an operator
    Derived,
}

/// Operator argument: an existing value or a plain number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// A registered value
    Value(ValueId),
    /// A number wrapped through the constant path on use
    Constant(f64),
}

impl From<ValueId> for Operand {
    fn from(id: ValueId) -> Self {
        Self::Value(id)
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Self::Constant(f64::from(value))
    }
}

/// One arithmetic operand as a block of literals, most significant first.
#[derive(Debug, Clone)]
pub struct SymbolicValue {
    pub(crate) block: Vec<Lit>,
    pub(crate) kind: ValueKind,
    pub(crate) decoded: Option<Complex64>,
}

impl SymbolicValue {
    pub(crate) fn new(block: Vec<Lit>, kind: ValueKind) -> Self {
        Self {
            block,
            kind,
            decoded: None,
        }
    }

    /// Literals of the block.
    #[must_use]
    pub fn block(&self) -> &[Lit] {
        &self.block
    }

    /// Origin of the value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Value in the most recent model, if any.
    #[must_use]
    pub fn decoded(&self) -> Option<Complex64> {
        self.decoded
    }
}
