//! The encoder: value registry and operator lowering.
//!
//! Every value is a block of `4 * (D + F)` literals holding `D + F`
//! base-4 digits. Arithmetic posts exact relations between blocks, so a
//! result that leaves the representable range makes the problem
//! unsatisfiable rather than wrapping around. Equality and inequality are
//! asserted through an auxiliary literal that is clamped true.

use crate::model::Model;
use crate::relation::{encode_product, encode_sum, encode_well_formed};
use crate::value::{Operand, SymbolicValue, ValueId, ValueKind};
use cnfx_circuits::{ArithmeticCircuits, BinaryGate, GateLibrary};
use cnfx_core::{
    BITS_PER_DIGIT, ClauseSink, ClauseStore, CnfxError, EncoderConfig, Lit, NumeralCodec, Result,
};
use num_complex::Complex64;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info, trace};

static NEXT_ENCODER: AtomicU32 = AtomicU32::new(0);

/// Operand resolved before any clause is emitted.
enum Prepared {
    Value(ValueId),
    Constant(f64, Vec<bool>),
}

/// Builds arithmetic constraints over symbolic values into a clause sink.
#[derive(Debug)]
pub struct Encoder<S = ClauseStore> {
    pub(crate) sink: S,
    codec: NumeralCodec,
    values: Vec<SymbolicValue>,
    id: u32,
}

impl Encoder<ClauseStore> {
    /// Create an encoder writing its CNF to `path`.
    pub fn create(config: EncoderConfig, path: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let store = ClauseStore::create(path)?;
        info!(
            integer_digits = config.integer_digits,
            fractional_digits = config.fractional_digits,
            path = %store.path().display(),
            "created encoder"
        );
        Self::with_sink(config, store)
    }

    /// Integer-only encoder with `digits` digits per value.
    pub fn integer(digits: u32, path: impl Into<PathBuf>) -> Result<Self> {
        Self::create(EncoderConfig::new(digits), path)
    }
}

impl<S: ClauseSink> Encoder<S> {
    /// Create an encoder over an arbitrary clause sink.
    pub fn with_sink(config: EncoderConfig, sink: S) -> Result<Self> {
        Ok(Self {
            sink,
            codec: NumeralCodec::new(config)?,
            values: Vec::new(),
            id: NEXT_ENCODER.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Digit layout of every value.
    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        self.codec.config()
    }

    /// The codec used for constants and decoding.
    #[must_use]
    pub fn codec(&self) -> &NumeralCodec {
        &self.codec
    }

    /// The underlying clause sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access for emitting custom clauses.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the encoder and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn lowest_exponent(&self) -> i32 {
        -(self.config().fractional_digits as i32)
    }

    fn register(&mut self, block: Vec<Lit>, kind: ValueKind) -> ValueId {
        let id = ValueId::new(self.id, self.values.len());
        trace!(%id, ?kind, "registered value");
        self.values.push(SymbolicValue::new(block, kind));
        id
    }

    fn get(&self, id: ValueId) -> Result<&SymbolicValue> {
        if id.owner != self.id {
            return Err(CnfxError::ForeignValue(id.index));
        }
        self.values
            .get(id.index)
            .ok_or(CnfxError::UnknownValue(id.index))
    }

    /// The registered value behind a handle.
    pub fn symbolic(&self, id: ValueId) -> Result<&SymbolicValue> {
        self.get(id)
    }

    /// Literals of a value's block, most significant first.
    pub fn block(&self, id: ValueId) -> Result<&[Lit]> {
        Ok(self.get(id)?.block())
    }

    /// Value decoded from the most recent model.
    #[must_use]
    pub fn value(&self, id: ValueId) -> Option<Complex64> {
        self.get(id).ok().and_then(SymbolicValue::decoded)
    }

    /// All values in creation order.
    pub fn values(&self) -> impl Iterator<Item = (ValueId, &SymbolicValue)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (ValueId::new(self.id, i), value))
    }

    /// A fresh value constrained only to well-formed digits.
    pub fn free_value(&mut self) -> Result<ValueId> {
        let block = self.fresh_block()?;
        Ok(self.register(block, ValueKind::Free))
    }

    /// A value clamped to the encoding of `value`.
    ///
    /// Out-of-range and non-finite inputs fail before any clause is written.
    pub fn constant(&mut self, value: f64) -> Result<ValueId> {
        let bits = self.codec.encode(value)?;
        self.clamped(value, &bits)
    }

    fn clamped(&mut self, value: f64, bits: &[bool]) -> Result<ValueId> {
        let block = self.sink.new_lits(bits.len());
        for (&lit, &bit) in block.iter().zip(bits) {
            self.sink.clamp(lit, bit)?;
        }
        debug!(value, "encoded constant");
        Ok(self.register(block, ValueKind::Constant(value)))
    }

    fn fresh_block(&mut self) -> Result<Vec<Lit>> {
        let len = self.config().block_len();
        let block = self.sink.new_lits(len);
        encode_well_formed(&mut self.sink, &block)?;
        Ok(block)
    }

    fn prepare(&self, operand: Operand) -> Result<Prepared> {
        match operand {
            Operand::Value(id) => {
                let len = self.get(id)?.block.len();
                if len != self.config().block_len() {
                    return Err(CnfxError::config(format!(
                        "value {id} has {len} bits, expected {}",
                        self.config().block_len()
                    )));
                }
                Ok(Prepared::Value(id))
            }
            Operand::Constant(value) => Ok(Prepared::Constant(value, self.codec.encode(value)?)),
        }
    }

    fn materialize(&mut self, prepared: Prepared) -> Result<ValueId> {
        match prepared {
            Prepared::Value(id) => Ok(id),
            Prepared::Constant(value, bits) => self.clamped(value, &bits),
        }
    }

    /// Resolve an operand to a registered value, wrapping constants.
    pub fn resolve(&mut self, operand: impl Into<Operand>) -> Result<ValueId> {
        let prepared = self.prepare(operand.into())?;
        self.materialize(prepared)
    }

    /// Resolve both operands, validating them before emitting anything.
    fn resolve_pair(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<(Vec<Lit>, Vec<Lit>)> {
        let lhs = self.prepare(lhs.into())?;
        let rhs = self.prepare(rhs.into())?;
        let lhs = self.materialize(lhs)?;
        let rhs = self.materialize(rhs)?;
        Ok((self.get(lhs)?.block.clone(), self.get(rhs)?.block.clone()))
    }

    /// `lhs + rhs`
    pub fn add(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<ValueId> {
        let (a, b) = self.resolve_pair(lhs, rhs)?;
        let out = self.fresh_block()?;
        let lowest = self.lowest_exponent();
        encode_sum(&mut self.sink, &a, &b, &out, lowest)?;
        Ok(self.register(out, ValueKind::Derived))
    }

    /// `lhs - rhs`, posted as `out + rhs = lhs`.
    pub fn subtract(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ValueId> {
        let (a, b) = self.resolve_pair(lhs, rhs)?;
        let out = self.fresh_block()?;
        let lowest = self.lowest_exponent();
        encode_sum(&mut self.sink, &out, &b, &a, lowest)?;
        Ok(self.register(out, ValueKind::Derived))
    }

    /// `lhs * rhs`.
    ///
    /// With fractional digits the exact product carries extra low digits;
    /// they are held in fresh remainder digits and dropped from the result.
    pub fn multiply(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ValueId> {
        let (a, b) = self.resolve_pair(lhs, rhs)?;
        let out = self.fresh_block()?;
        let remainder_len = self.config().fractional_digits as usize * BITS_PER_DIGIT;
        let remainder = self.sink.new_lits(remainder_len);
        encode_well_formed(&mut self.sink, &remainder)?;
        let mut product = out.clone();
        product.extend_from_slice(&remainder);
        let lowest = self.lowest_exponent();
        encode_product(&mut self.sink, &a, &b, &product, lowest)?;
        Ok(self.register(out, ValueKind::Derived))
    }

    fn bitwise(
        &mut self,
        gate: BinaryGate,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<ValueId> {
        let (a, b) = self.resolve_pair(lhs, rhs)?;
        let out = self.sink.mk_bitwise(gate, &a, &b)?;
        Ok(self.register(out, ValueKind::Derived))
    }

    /// Digit-wise AND of the bit patterns.
    pub fn bit_and(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<ValueId> {
        self.bitwise(BinaryGate::And, lhs, rhs)
    }

    /// Digit-wise OR of the bit patterns.
    pub fn bit_or(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<ValueId> {
        self.bitwise(BinaryGate::Or, lhs, rhs)
    }

    /// Digit-wise XOR of the bit patterns.
    pub fn bit_xor(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<ValueId> {
        self.bitwise(BinaryGate::Xor, lhs, rhs)
    }

    fn rotate(&mut self, operand: impl Into<Operand>, digits: usize, left: bool) -> Result<ValueId> {
        let id = self.resolve(operand)?;
        let total = self.config().total_digits();
        if digits % total == 0 {
            return Ok(id);
        }
        let block = self.get(id)?.block.clone();
        let bits = digits % total * BITS_PER_DIGIT;
        let out = if left {
            self.sink.rotate_left(&block, bits)?
        } else {
            self.sink.rotate_right(&block, bits)?
        };
        Ok(self.register(out, ValueKind::Derived))
    }

    /// Rotate the digits toward the most significant end, wrapping around.
    ///
    /// Rotating by a multiple of the digit count returns the operand itself.
    pub fn rotate_left(&mut self, operand: impl Into<Operand>, digits: usize) -> Result<ValueId> {
        self.rotate(operand, digits, true)
    }

    /// Rotate the digits toward the least significant end, wrapping around.
    pub fn rotate_right(&mut self, operand: impl Into<Operand>, digits: usize) -> Result<ValueId> {
        self.rotate(operand, digits, false)
    }

    /// Literal that is true iff both operands hold the same value.
    pub fn equal(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Lit> {
        let (a, b) = self.resolve_pair(lhs, rhs)?;
        self.sink.mk_equal(&a, &b)
    }

    /// Literal that is true iff the operands hold different values.
    pub fn not_equal(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Lit> {
        let (a, b) = self.resolve_pair(lhs, rhs)?;
        self.sink.mk_not_equal(&a, &b)
    }

    /// Require `lhs == rhs`.
    pub fn assert_equal(&mut self, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<()> {
        let z = self.equal(lhs, rhs)?;
        self.sink.clamp(z, true)
    }

    /// Require `lhs != rhs`.
    pub fn assert_not_equal(
        &mut self,
        lhs: impl Into<Operand>,
        rhs: impl Into<Operand>,
    ) -> Result<()> {
        let z = self.not_equal(lhs, rhs)?;
        self.sink.clamp(z, true)
    }

    /// Decode every registered value from `model`.
    ///
    /// Nothing is updated unless every block variable is assigned.
    pub fn apply_model(&mut self, model: &Model) -> Result<()> {
        let mut decoded = Vec::with_capacity(self.values.len());
        for value in &self.values {
            let bits = value
                .block
                .iter()
                .map(|&lit| model.require(lit))
                .collect::<Result<Vec<bool>>>()?;
            decoded.push(self.codec.decode(&bits));
        }
        for (value, number) in self.values.iter_mut().zip(decoded) {
            value.decoded = Some(number);
        }
        Ok(())
    }
}
