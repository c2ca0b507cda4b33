//! Binary arithmetic circuits built from the gate library.
//!
//! Bit vectors here are unsigned and least-significant bit first.
//! Builders that accept preallocated output literals reuse them, so
//! composite circuits can wire one stage directly into the next.

use crate::gates::{BinaryGate, GateLibrary, check_widths};
use cnfx_core::{ClauseSink, Lit, Result};
use tracing::trace;

/// Sum bits and final carry of an adder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdderOutput {
    /// Sum, same width as the operands
    pub sum: Vec<Lit>,
    /// Carry out of the most significant position
    pub carry: Lit,
}

/// Adders, multipliers, rotations and vector comparisons.
pub trait ArithmeticCircuits: GateLibrary {
    /// sum = a ^ b, carry = a & b
    fn encode_half_adder(&mut self, sum: Lit, carry: Lit, a: Lit, b: Lit) -> Result<()> {
        self.encode_xor(sum, a, b)?;
        self.encode_and(carry, a, b)
    }

    /// Half adder with fresh outputs, returned as `(sum, carry)`.
    fn mk_half_adder(&mut self, a: Lit, b: Lit) -> Result<(Lit, Lit)> {
        let sum = self.new_lit();
        let carry = self.new_lit();
        self.encode_half_adder(sum, carry, a, b)?;
        Ok((sum, carry))
    }

    /// Two chained half adders joined by an OR of their carries.
    fn encode_full_adder(
        &mut self,
        sum: Lit,
        carry: Lit,
        a: Lit,
        b: Lit,
        carry_in: Lit,
    ) -> Result<()> {
        let x = self.new_lit();
        let y = self.new_lit();
        let z = self.new_lit();
        self.encode_half_adder(x, y, a, b)?;
        self.encode_half_adder(sum, z, x, carry_in)?;
        self.encode_or(carry, y, z)
    }

    /// Full adder with fresh outputs, returned as `(sum, carry)`.
    fn mk_full_adder(&mut self, a: Lit, b: Lit, carry_in: Lit) -> Result<(Lit, Lit)> {
        let sum = self.new_lit();
        let carry = self.new_lit();
        self.encode_full_adder(sum, carry, a, b, carry_in)?;
        Ok((sum, carry))
    }

    /// Ripple-carry adder writing into `sum`; returns the carry out.
    ///
    /// Position 0 uses a half adder when there is no carry in. When
    /// `carry_out` is given it becomes the final carry wire.
    fn encode_ripple_carry_add(
        &mut self,
        sum: &[Lit],
        a: &[Lit],
        b: &[Lit],
        carry_in: Option<Lit>,
        carry_out: Option<Lit>,
    ) -> Result<Lit> {
        check_widths(a, b)?;
        check_widths(sum, a)?;

        let mut carry = carry_in;
        for i in 0..a.len() {
            let next = match carry_out {
                Some(out) if i + 1 == a.len() => out,
                _ => self.new_lit(),
            };
            match carry {
                Some(c) => self.encode_full_adder(sum[i], next, a[i], b[i], c)?,
                None => self.encode_half_adder(sum[i], next, a[i], b[i])?,
            }
            carry = Some(next);
        }

        let last = match carry {
            Some(c) => c,
            None => self.constant(false)?,
        };
        match carry_out {
            Some(out) if a.is_empty() => {
                self.encode_copy(out, last)?;
                Ok(out)
            }
            _ => Ok(last),
        }
    }

    /// Ripple-carry adder with fresh outputs.
    fn ripple_carry_add(
        &mut self,
        a: &[Lit],
        b: &[Lit],
        carry_in: Option<Lit>,
    ) -> Result<AdderOutput> {
        check_widths(a, b)?;
        let sum = self.new_lits(a.len());
        let carry = self.encode_ripple_carry_add(&sum, a, b, carry_in, None)?;
        Ok(AdderOutput { sum, carry })
    }

    /// Two's-complement `a - b`: the adder with `b` negated and the
    /// carry seed clamped true. The carry out is set iff `a >= b`.
    fn ripple_carry_subtract(&mut self, a: &[Lit], b: &[Lit]) -> Result<AdderOutput> {
        check_widths(a, b)?;
        let seed = self.new_lit();
        self.clamp(seed, true)?;
        let negated: Vec<Lit> = b.iter().map(|lit| lit.negate()).collect();
        self.ripple_carry_add(a, &negated, Some(seed))
    }

    /// `a + b` one bit wider than the wider operand, so it never overflows.
    fn mk_wide_sum(&mut self, a: &[Lit], b: &[Lit]) -> Result<Vec<Lit>> {
        let width = a.len().max(b.len());
        let a = self.zero_extend(a, width)?;
        let b = self.zero_extend(b, width)?;
        let AdderOutput { mut sum, carry } = self.ripple_carry_add(&a, &b, None)?;
        sum.push(carry);
        Ok(sum)
    }

    /// Pad `bits` with constant-false literals up to `width`.
    fn zero_extend(&mut self, bits: &[Lit], width: usize) -> Result<Vec<Lit>> {
        let mut out = bits.to_vec();
        if out.len() < width {
            let zero = self.constant(false)?;
            out.resize(width, zero);
        }
        Ok(out)
    }

    /// 2-bit by 2-bit product from four ANDs and two half adders.
    fn multiply_2x2(&mut self, a: [Lit; 2], b: [Lit; 2]) -> Result<[Lit; 4]> {
        let p0 = self.mk_and(a[0], b[0])?;
        let t1 = self.mk_and(a[1], b[0])?;
        let t2 = self.mk_and(a[0], b[1])?;
        let (p1, c1) = self.mk_half_adder(t1, t2)?;
        let t3 = self.mk_and(a[1], b[1])?;
        let (p2, p3) = self.mk_half_adder(t3, c1)?;
        Ok([p0, p1, p2, p3])
    }

    /// Full product of `a` and `b`, `a.len() + b.len()` bits wide.
    ///
    /// Both operands are split into low and high halves; the four partial
    /// products are built recursively down to AND rows or the 2x2
    /// multiplier and summed with ripple-carry adders.
    fn mk_product(&mut self, a: &[Lit], b: &[Lit]) -> Result<Vec<Lit>> {
        let total = a.len() + b.len();
        if a.is_empty() || b.is_empty() {
            return self.zero_extend(&[], total);
        }
        if a.len() == 1 || b.len() == 1 {
            let (single, row) = if a.len() == 1 { (a[0], b) } else { (b[0], a) };
            let mut out = Vec::with_capacity(total);
            for &bit in row {
                out.push(self.mk_and(single, bit)?);
            }
            return self.zero_extend(&out, total);
        }
        if a.len() == 2 && b.len() == 2 {
            return Ok(self.multiply_2x2([a[0], a[1]], [b[0], b[1]])?.to_vec());
        }

        let (half_a, half_b) = (a.len() / 2, b.len() / 2);
        let (a_lo, a_hi) = a.split_at(half_a);
        let (b_lo, b_hi) = b.split_at(half_b);
        let low = self.mk_product(a_lo, b_lo)?;
        let cross_lh = self.mk_product(a_lo, b_hi)?;
        let cross_hl = self.mk_product(a_hi, b_lo)?;
        let high = self.mk_product(a_hi, b_hi)?;

        let mut acc = self.zero_extend(&low, total)?;
        for (term, shift) in [
            (cross_lh, half_b),
            (cross_hl, half_a),
            (high, half_a + half_b),
        ] {
            // Partial sums never exceed the final product, so the carry
            // out of each addition is always false and dropped.
            let term = self.zero_extend(&term, total - shift)?;
            let added = self.ripple_carry_add(&acc[shift..], &term, None)?;
            acc.truncate(shift);
            acc.extend(added.sum);
        }
        trace!(lhs = a.len(), rhs = b.len(), "built partial-product multiplier");
        Ok(acc)
    }

    /// Product truncated to `width` bits.
    ///
    /// When `overflow` is given it is constrained to the OR of every
    /// product bit that was cut off.
    fn multiply(
        &mut self,
        a: &[Lit],
        b: &[Lit],
        width: usize,
        overflow: Option<Lit>,
    ) -> Result<Vec<Lit>> {
        let mut full = self.mk_product(a, b)?;
        let width = width.min(full.len());
        let dropped = full.split_off(width);
        if let Some(flag) = overflow {
            self.encode_or_all(flag, &dropped)?;
        }
        Ok(full)
    }

    /// `out[i] = bits[(i + k) % n]` through copy gates; no gates when the
    /// rotation is trivial.
    fn rotate_left(&mut self, bits: &[Lit], k: usize) -> Result<Vec<Lit>> {
        let n = bits.len();
        if n == 0 || k % n == 0 {
            return Ok(bits.to_vec());
        }
        let out = self.new_lits(n);
        for (i, &o) in out.iter().enumerate() {
            self.encode_copy(o, bits[(i + k) % n])?;
        }
        Ok(out)
    }

    /// Inverse of [`ArithmeticCircuits::rotate_left`].
    fn rotate_right(&mut self, bits: &[Lit], k: usize) -> Result<Vec<Lit>> {
        let n = bits.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        self.rotate_left(bits, n - k % n)
    }

    /// Fresh literal that is true iff the vectors agree on every bit.
    fn mk_equal(&mut self, a: &[Lit], b: &[Lit]) -> Result<Lit> {
        let same = self.mk_bitwise(BinaryGate::Xnor, a, b)?;
        self.mk_and_all(&same)
    }

    /// Fresh literal that is true iff the vectors differ somewhere.
    fn mk_not_equal(&mut self, a: &[Lit], b: &[Lit]) -> Result<Lit> {
        let diff = self.mk_bitwise(BinaryGate::Xor, a, b)?;
        self.mk_or_all(&diff)
    }

    /// Hard equality of two unsigned numbers of possibly different widths.
    fn encode_unsigned_equal(&mut self, a: &[Lit], b: &[Lit]) -> Result<()> {
        let common = a.len().min(b.len());
        self.encode_copy_all(&a[..common], &b[..common])?;
        for &extra in a[common..].iter().chain(&b[common..]) {
            self.clamp(extra, false)?;
        }
        Ok(())
    }

    /// Bitwise conjunction of two equal-width vectors.
    fn bitwise_and(&mut self, a: &[Lit], b: &[Lit]) -> Result<Vec<Lit>> {
        self.mk_bitwise(BinaryGate::And, a, b)
    }

    /// Bitwise disjunction of two equal-width vectors.
    fn bitwise_or(&mut self, a: &[Lit], b: &[Lit]) -> Result<Vec<Lit>> {
        self.mk_bitwise(BinaryGate::Or, a, b)
    }

    /// Bitwise exclusive or of two equal-width vectors.
    fn bitwise_xor(&mut self, a: &[Lit], b: &[Lit]) -> Result<Vec<Lit>> {
        self.mk_bitwise(BinaryGate::Xor, a, b)
    }
}

impl<S: GateLibrary + ?Sized> ArithmeticCircuits for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{all_models, assignments, from_u64, to_u64, unique_model};
    use cnfx_core::MemorySink;
    use proptest::prelude::*;

    fn clamp_bits(sink: &mut MemorySink, lits: &[Lit], value: u64) {
        for (&lit, bit) in lits.iter().zip(from_u64(value, lits.len())) {
            sink.clamp(lit, bit).unwrap();
        }
    }

    #[test]
    fn test_half_adder() {
        for values in assignments(2) {
            let mut sink = MemorySink::new();
            let a = sink.new_lit();
            let b = sink.new_lit();
            let (sum, carry) = sink.mk_half_adder(a, b).unwrap();
            sink.clamp(a, values[0]).unwrap();
            sink.clamp(b, values[1]).unwrap();
            let model = unique_model(&sink, &[sum, carry]);
            assert_eq!(model, vec![values[0] ^ values[1], values[0] && values[1]]);
        }
    }

    #[test]
    fn test_full_adder() {
        for values in assignments(3) {
            let mut sink = MemorySink::new();
            let ins = sink.new_lits(3);
            let (sum, carry) = sink.mk_full_adder(ins[0], ins[1], ins[2]).unwrap();
            for (&lit, &v) in ins.iter().zip(&values) {
                sink.clamp(lit, v).unwrap();
            }
            let ones = values.iter().filter(|&&v| v).count();
            assert_eq!(
                unique_model(&sink, &[sum, carry]),
                vec![ones % 2 == 1, ones >= 2]
            );
        }
    }

    #[test]
    fn test_multiply_2x2_exhaustive() {
        for a in 0..4u64 {
            for b in 0..4u64 {
                let mut sink = MemorySink::new();
                let xs = sink.new_lits(2);
                let ys = sink.new_lits(2);
                let product = sink.multiply_2x2([xs[0], xs[1]], [ys[0], ys[1]]).unwrap();
                clamp_bits(&mut sink, &xs, a);
                clamp_bits(&mut sink, &ys, b);
                assert_eq!(to_u64(&unique_model(&sink, &product)), a * b);
            }
        }
    }

    #[test]
    fn test_adder_reuses_supplied_outputs() {
        let mut sink = MemorySink::new();
        let a = sink.new_lits(3);
        let b = sink.new_lits(3);
        let sum = sink.new_lits(3);
        let carry = sink.new_lit();
        let vars_before = sink.num_vars();
        let returned = sink
            .encode_ripple_carry_add(&sum, &a, &b, None, Some(carry))
            .unwrap();
        assert_eq!(returned, carry);
        clamp_bits(&mut sink, &a, 6);
        clamp_bits(&mut sink, &b, 5);
        let mut watched = sum.clone();
        watched.push(carry);
        assert_eq!(to_u64(&unique_model(&sink, &watched)), 11);
        // Three full/half stages: two internal carries plus 3 glue wires
        // per full adder.
        assert_eq!(sink.num_vars() - vars_before, 2 + 3 * 2);
    }

    #[test]
    fn test_empty_adder_passes_carry_through() {
        let mut sink = MemorySink::new();
        let cin = sink.new_lit();
        let out = sink.ripple_carry_add(&[], &[], Some(cin)).unwrap();
        assert!(out.sum.is_empty());
        assert_eq!(out.carry, cin);
    }

    #[test]
    fn test_rotation() {
        let mut sink = MemorySink::new();
        let bits = sink.new_lits(5);
        let before = sink.num_clauses();
        assert_eq!(sink.rotate_left(&bits, 0).unwrap(), bits);
        assert_eq!(sink.rotate_right(&bits, 10).unwrap(), bits);
        assert_eq!(sink.num_clauses(), before);

        let left = sink.rotate_left(&bits, 2).unwrap();
        let right = sink.rotate_right(&bits, 2).unwrap();
        clamp_bits(&mut sink, &bits, 0b00011);
        assert_eq!(unique_model(&sink, &left), vec![false, false, false, true, true]);
        assert_eq!(unique_model(&sink, &right), vec![false, false, true, true, false]);
    }

    #[test]
    fn test_reified_comparisons() {
        let mut sink = MemorySink::new();
        let a = sink.new_lits(2);
        let b = sink.new_lits(2);
        let eq = sink.mk_equal(&a, &b).unwrap();
        let ne = sink.mk_not_equal(&a, &b).unwrap();
        let mut watched = a.clone();
        watched.extend(&b);
        watched.extend([eq, ne]);
        let models = all_models(&sink, &watched);
        assert_eq!(models.len(), 16);
        for m in models {
            let same = m[0] == m[2] && m[1] == m[3];
            assert_eq!(m[4], same);
            assert_eq!(m[5], !same);
        }
    }

    #[test]
    fn test_unsigned_equal_with_padding() {
        let mut sink = MemorySink::new();
        let a = sink.new_lits(2);
        let b = sink.new_lits(4);
        sink.encode_unsigned_equal(&a, &b).unwrap();
        clamp_bits(&mut sink, &a, 3);
        assert_eq!(to_u64(&unique_model(&sink, &b)), 3);
    }

    proptest! {
        #[test]
        fn prop_ripple_carry_add(a in 0u64..16, b in 0u64..16, cin in any::<bool>()) {
            let mut sink = MemorySink::new();
            let xs = sink.new_lits(4);
            let ys = sink.new_lits(4);
            let seed = sink.new_lit();
            let out = sink.ripple_carry_add(&xs, &ys, Some(seed)).unwrap();
            clamp_bits(&mut sink, &xs, a);
            clamp_bits(&mut sink, &ys, b);
            sink.clamp(seed, cin).unwrap();
            let mut watched = out.sum.clone();
            watched.push(out.carry);
            prop_assert_eq!(to_u64(&unique_model(&sink, &watched)), a + b + u64::from(cin));
        }

        #[test]
        fn prop_ripple_carry_subtract(a in 0u64..16, b in 0u64..16) {
            let mut sink = MemorySink::new();
            let xs = sink.new_lits(4);
            let ys = sink.new_lits(4);
            let out = sink.ripple_carry_subtract(&xs, &ys).unwrap();
            clamp_bits(&mut sink, &xs, a);
            clamp_bits(&mut sink, &ys, b);
            let mut watched = out.sum.clone();
            watched.push(out.carry);
            let model = unique_model(&sink, &watched);
            prop_assert_eq!(to_u64(&model[..4]), a.wrapping_sub(b) & 0xf);
            prop_assert_eq!(model[4], a >= b);
        }

        #[test]
        fn prop_wide_sum(a in 0u64..32, b in 0u64..8) {
            let mut sink = MemorySink::new();
            let xs = sink.new_lits(5);
            let ys = sink.new_lits(3);
            let sum = sink.mk_wide_sum(&xs, &ys).unwrap();
            prop_assert_eq!(sum.len(), 6);
            clamp_bits(&mut sink, &xs, a);
            clamp_bits(&mut sink, &ys, b);
            prop_assert_eq!(to_u64(&unique_model(&sink, &sum)), a + b);
        }

        #[test]
        fn prop_full_product(
            wa in 1usize..6,
            wb in 1usize..6,
            a in 0u64..32,
            b in 0u64..32,
        ) {
            let (a, b) = (a % (1 << wa), b % (1 << wb));
            let mut sink = MemorySink::new();
            let xs = sink.new_lits(wa);
            let ys = sink.new_lits(wb);
            let product = sink.mk_product(&xs, &ys).unwrap();
            prop_assert_eq!(product.len(), wa + wb);
            clamp_bits(&mut sink, &xs, a);
            clamp_bits(&mut sink, &ys, b);
            prop_assert_eq!(to_u64(&unique_model(&sink, &product)), a * b);
        }

        #[test]
        fn prop_truncated_product_flags_overflow(a in 0u64..16, b in 0u64..16) {
            let mut sink = MemorySink::new();
            let xs = sink.new_lits(4);
            let ys = sink.new_lits(4);
            let overflow = sink.new_lit();
            let product = sink.multiply(&xs, &ys, 4, Some(overflow)).unwrap();
            clamp_bits(&mut sink, &xs, a);
            clamp_bits(&mut sink, &ys, b);
            let mut watched = product.clone();
            watched.push(overflow);
            let model = unique_model(&sink, &watched);
            prop_assert_eq!(to_u64(&model[..4]), (a * b) & 0xf);
            prop_assert_eq!(model[4], a * b >= 16);
        }
    }
}
