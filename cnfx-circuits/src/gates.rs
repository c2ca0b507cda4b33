//! Tseitin encodings of Boolean gates.
//!
//! Every gate comes in two forms: `encode_*` constrains an existing output
//! literal, `mk_*` allocates a fresh output and returns it. Negative gates
//! (NAND, NOR, XNOR) are their positive counterparts with the output
//! literal negated.

use cnfx_core::{ClauseSink, CnfxError, Lit, Result};

/// Two-input gate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryGate {
    /// Conjunction
    And,
    /// Negated conjunction
    Nand,
    /// Disjunction
    Or,
    /// Negated disjunction
    Nor,
    /// Exclusive or
    Xor,
    /// Equivalence
    Xnor,
}

impl BinaryGate {
    /// Truth table of the gate.
    #[must_use]
    pub fn eval(self, a: bool, b: bool) -> bool {
        match self {
            Self::And => a && b,
            Self::Nand => !(a && b),
            Self::Or => a || b,
            Self::Nor => !(a || b),
            Self::Xor => a != b,
            Self::Xnor => a == b,
        }
    }
}

/// Clause-level gate constructors available on every [`ClauseSink`].
pub trait GateLibrary: ClauseSink {
    /// out = !a
    fn encode_not(&mut self, out: Lit, a: Lit) -> Result<()> {
        self.add_clause(&[out, a])?;
        self.add_clause(&[out.negate(), a.negate()])
    }

    /// out = a
    fn encode_copy(&mut self, out: Lit, a: Lit) -> Result<()> {
        self.add_clause(&[out.negate(), a])?;
        self.add_clause(&[out, a.negate()])
    }

    /// out = a & b
    fn encode_and(&mut self, out: Lit, a: Lit, b: Lit) -> Result<()> {
        self.add_clause(&[out.negate(), a])?;
        self.add_clause(&[out.negate(), b])?;
        self.add_clause(&[out, a.negate(), b.negate()])
    }

    /// out = a | b
    fn encode_or(&mut self, out: Lit, a: Lit, b: Lit) -> Result<()> {
        self.add_clause(&[out, a.negate()])?;
        self.add_clause(&[out, b.negate()])?;
        self.add_clause(&[out.negate(), a, b])
    }

    /// out = a ^ b
    fn encode_xor(&mut self, out: Lit, a: Lit, b: Lit) -> Result<()> {
        self.add_clause(&[out.negate(), a.negate(), b.negate()])?;
        self.add_clause(&[out.negate(), a, b])?;
        self.add_clause(&[out, a.negate(), b])?;
        self.add_clause(&[out, a, b.negate()])
    }

    /// out = gate(a, b)
    fn encode_binary(&mut self, gate: BinaryGate, out: Lit, a: Lit, b: Lit) -> Result<()> {
        match gate {
            BinaryGate::And => self.encode_and(out, a, b),
            BinaryGate::Nand => self.encode_and(out.negate(), a, b),
            BinaryGate::Or => self.encode_or(out, a, b),
            BinaryGate::Nor => self.encode_or(out.negate(), a, b),
            BinaryGate::Xor => self.encode_xor(out, a, b),
            BinaryGate::Xnor => self.encode_xor(out.negate(), a, b),
        }
    }

    /// out = sel ? if_true : if_false
    fn encode_mux(&mut self, out: Lit, sel: Lit, if_true: Lit, if_false: Lit) -> Result<()> {
        self.add_clause(&[sel.negate(), if_true.negate(), out])?;
        self.add_clause(&[sel.negate(), if_true, out.negate()])?;
        self.add_clause(&[sel, if_false.negate(), out])?;
        self.add_clause(&[sel, if_false, out.negate()])
    }

    /// out = inputs[0] & inputs[1] & ...; an empty conjunction is true.
    fn encode_and_all(&mut self, out: Lit, inputs: &[Lit]) -> Result<()> {
        let mut big = Vec::with_capacity(inputs.len() + 1);
        big.push(out);
        for &input in inputs {
            self.add_clause(&[out.negate(), input])?;
            big.push(input.negate());
        }
        self.add_clause(&big)
    }

    /// out = inputs[0] | inputs[1] | ...; an empty disjunction is false.
    fn encode_or_all(&mut self, out: Lit, inputs: &[Lit]) -> Result<()> {
        let mut big = Vec::with_capacity(inputs.len() + 1);
        big.push(out.negate());
        for &input in inputs {
            self.add_clause(&[out, input.negate()])?;
            big.push(input);
        }
        self.add_clause(&big)
    }

    /// out = a ^ b ^ c, one clause per row of the truth table.
    fn encode_fa_sum(&mut self, out: Lit, a: Lit, b: Lit, c: Lit) -> Result<()> {
        for row in 0u8..8 {
            let (va, vb, vc) = (row & 1 != 0, row & 2 != 0, row & 4 != 0);
            let parity = va ^ vb ^ vc;
            let pick = |lit: Lit, value: bool| if value { lit.negate() } else { lit };
            self.add_clause(&[
                pick(a, va),
                pick(b, vb),
                pick(c, vc),
                if parity { out } else { out.negate() },
            ])?;
        }
        Ok(())
    }

    /// out = majority(a, b, c)
    fn encode_fa_carry(&mut self, out: Lit, a: Lit, b: Lit, c: Lit) -> Result<()> {
        for (x, y) in [(a, b), (a, c), (b, c)] {
            self.add_clause(&[x.negate(), y.negate(), out])?;
            self.add_clause(&[x, y, out.negate()])?;
        }
        Ok(())
    }

    /// Fresh literal equal to `!a`.
    fn mk_not(&mut self, a: Lit) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_not(out, a)?;
        Ok(out)
    }

    /// Fresh literal equal to `a`.
    fn mk_copy(&mut self, a: Lit) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_copy(out, a)?;
        Ok(out)
    }

    /// Fresh literal equal to `gate(a, b)`.
    fn mk_binary(&mut self, gate: BinaryGate, a: Lit, b: Lit) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_binary(gate, out, a, b)?;
        Ok(out)
    }

    /// Fresh literal equal to `a & b`.
    fn mk_and(&mut self, a: Lit, b: Lit) -> Result<Lit> {
        self.mk_binary(BinaryGate::And, a, b)
    }

    /// Fresh literal equal to `a | b`.
    fn mk_or(&mut self, a: Lit, b: Lit) -> Result<Lit> {
        self.mk_binary(BinaryGate::Or, a, b)
    }

    /// Fresh literal equal to `a ^ b`.
    fn mk_xor(&mut self, a: Lit, b: Lit) -> Result<Lit> {
        self.mk_binary(BinaryGate::Xor, a, b)
    }

    /// Fresh literal equal to `a == b`.
    fn mk_xnor(&mut self, a: Lit, b: Lit) -> Result<Lit> {
        self.mk_binary(BinaryGate::Xnor, a, b)
    }

    /// Fresh literal equal to `sel ? if_true : if_false`.
    fn mk_mux(&mut self, sel: Lit, if_true: Lit, if_false: Lit) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_mux(out, sel, if_true, if_false)?;
        Ok(out)
    }

    /// Fresh literal equal to the conjunction of `inputs`.
    fn mk_and_all(&mut self, inputs: &[Lit]) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_and_all(out, inputs)?;
        Ok(out)
    }

    /// Fresh literal equal to the disjunction of `inputs`.
    fn mk_or_all(&mut self, inputs: &[Lit]) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_or_all(out, inputs)?;
        Ok(out)
    }

    /// Fresh literal equal to `a ^ b ^ c`.
    fn mk_fa_sum(&mut self, a: Lit, b: Lit, c: Lit) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_fa_sum(out, a, b, c)?;
        Ok(out)
    }

    /// Fresh literal equal to `majority(a, b, c)`.
    fn mk_fa_carry(&mut self, a: Lit, b: Lit, c: Lit) -> Result<Lit> {
        let out = self.new_lit();
        self.encode_fa_carry(out, a, b, c)?;
        Ok(out)
    }

    /// Apply `gate` position by position to two equal-length vectors.
    fn mk_bitwise(&mut self, gate: BinaryGate, a: &[Lit], b: &[Lit]) -> Result<Vec<Lit>> {
        check_widths(a, b)?;
        a.iter()
            .zip(b)
            .map(|(&x, &y)| self.mk_binary(gate, x, y))
            .collect()
    }

    /// Constrain two equal-length vectors to be identical, bit by bit.
    fn encode_copy_all(&mut self, out: &[Lit], a: &[Lit]) -> Result<()> {
        check_widths(out, a)?;
        for (&o, &x) in out.iter().zip(a) {
            self.encode_copy(o, x)?;
        }
        Ok(())
    }
}

impl<S: ClauseSink + ?Sized> GateLibrary for S {}

/// Fail unless both vectors have the same width.
pub fn check_widths(a: &[Lit], b: &[Lit]) -> Result<()> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(CnfxError::config(format!(
            "operand widths differ: {} vs {}",
            a.len(),
            b.len()
        )))
    }
}
