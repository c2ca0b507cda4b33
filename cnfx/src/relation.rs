//! Exact digit arithmetic as relations between unsigned binary numbers.
//!
//! A block with digits `d_k` (weight `(-4)^k`) has value
//! `sum d_k * 4^k` over even `k` minus the same sum over odd `k`. Scaling
//! by `4^F` turns both sums into unsigned integers `P` and `N` whose base-4
//! digits are exactly the block's digits, two binary bits per digit.
//! Equations between values then become equations between sums of `P`
//! and `N` terms, which ripple-carry adders and multipliers evaluate
//! without overflow.

use cnfx_circuits::{ArithmeticCircuits, GateLibrary};
use cnfx_core::{BITS_PER_DIGIT, ClauseSink, Lit, Result};

/// Binary weight-1 and weight-2 bits of the digit stored in a 4-bit group.
fn digit_bits(group: &[Lit]) -> [Lit; 2] {
    [group[3], group[0]]
}

/// Restrict every 4-bit group of `block` to one of the four digit codes.
pub fn encode_well_formed<S: ClauseSink>(sink: &mut S, block: &[Lit]) -> Result<()> {
    for group in block.chunks(BITS_PER_DIGIT) {
        sink.clamp(group[2], false)?;
        sink.encode_copy(group[1], group[0])?;
    }
    Ok(())
}

/// Unsigned even-weight and odd-weight parts of a block.
#[derive(Debug, Clone)]
pub struct SignedParts {
    /// Digits at even exponents, least significant bit first
    pub positive: Vec<Lit>,
    /// Digits at odd exponents, least significant bit first
    pub negative: Vec<Lit>,
}

/// Split `block` whose least significant digit has exponent `lowest`.
pub fn split<S: ClauseSink>(sink: &mut S, block: &[Lit], lowest: i32) -> Result<SignedParts> {
    let zero = sink.constant(false)?;
    let width = 2 * block.len() / BITS_PER_DIGIT;
    let mut parts = SignedParts {
        positive: vec![zero; width],
        negative: vec![zero; width],
    };
    for (j, group) in block.chunks(BITS_PER_DIGIT).rev().enumerate() {
        let exponent = lowest + j as i32;
        let target = if exponent.rem_euclid(2) == 0 {
            &mut parts.positive
        } else {
            &mut parts.negative
        };
        let [low, high] = digit_bits(group);
        target[2 * j] = low;
        target[2 * j + 1] = high;
    }
    Ok(parts)
}

/// Sum of unsigned terms, wide enough never to overflow.
fn sum_all<S: ClauseSink>(sink: &mut S, terms: &[&[Lit]]) -> Result<Vec<Lit>> {
    let mut acc = terms.first().map(|t| t.to_vec()).unwrap_or_default();
    for term in terms.iter().skip(1) {
        acc = sink.mk_wide_sum(&acc, term)?;
    }
    Ok(acc)
}

/// Constrain `lhs + rhs = out` for three blocks sharing exponent `lowest`.
pub fn encode_sum<S: ClauseSink>(
    sink: &mut S,
    lhs: &[Lit],
    rhs: &[Lit],
    out: &[Lit],
    lowest: i32,
) -> Result<()> {
    let a = split(sink, lhs, lowest)?;
    let b = split(sink, rhs, lowest)?;
    let o = split(sink, out, lowest)?;
    let left = sum_all(
        sink,
        &[a.positive.as_slice(), b.positive.as_slice(), o.negative.as_slice()],
    )?;
    let right = sum_all(
        sink,
        &[o.positive.as_slice(), a.negative.as_slice(), b.negative.as_slice()],
    )?;
    sink.encode_unsigned_equal(&left, &right)
}

/// Constrain `lhs * rhs = product`.
///
/// `product` holds twice the fractional digits of the operands, so its
/// lowest exponent is `2 * lowest`.
pub fn encode_product<S: ClauseSink>(
    sink: &mut S,
    lhs: &[Lit],
    rhs: &[Lit],
    product: &[Lit],
    lowest: i32,
) -> Result<()> {
    let a = split(sink, lhs, lowest)?;
    let b = split(sink, rhs, lowest)?;
    let q = split(sink, product, 2 * lowest)?;
    let pp = sink.mk_product(&a.positive, &b.positive)?;
    let nn = sink.mk_product(&a.negative, &b.negative)?;
    let pn = sink.mk_product(&a.positive, &b.negative)?;
    let np = sink.mk_product(&a.negative, &b.positive)?;
    let left = sum_all(sink, &[pp.as_slice(), nn.as_slice(), q.negative.as_slice()])?;
    let right = sum_all(sink, &[q.positive.as_slice(), pn.as_slice(), np.as_slice()])?;
    sink.encode_unsigned_equal(&left, &right)
}
