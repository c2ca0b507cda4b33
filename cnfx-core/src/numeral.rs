//! Complex-base numeral codec.
//!
//! Values are stored as base-4 digits with weights `(-4)^k`, where `k`
//! runs from `D - 1` down to `-F`. Each digit expands to a fixed four-bit
//! code, and because `(-1+i)^4 = -4` the resulting bit string is also a
//! positional number in base `-1+i`: bit `j` of a block carries weight
//! `(-1+i)^(4D - 1 - j)`.
//!
//! | digit | code (MSB first) |
//! |-------|------------------|
//! | 0     | `0000`           |
//! | 1     | `0001`           |
//! | 2     | `1100`           |
//! | 3     | `1101`           |

use crate::config::{BITS_PER_DIGIT, EncoderConfig};
use crate::error::{CnfxError, Result};
use num_complex::Complex64;

const DIGIT_CODES: [[bool; BITS_PER_DIGIT]; 4] = [
    [false, false, false, false],
    [false, false, false, true],
    [true, true, false, false],
    [true, true, false, true],
];

/// `(-1+i)^r` for `r` in `0..4`.
const BASE_POWERS: [Complex64; 4] = [
    Complex64::new(1.0, 0.0),
    Complex64::new(-1.0, 1.0),
    Complex64::new(0.0, -2.0),
    Complex64::new(2.0, 2.0),
];

/// Four-bit code of a digit in `0..4`, most significant bit first.
#[must_use]
pub fn digit_code(digit: u8) -> Option<[bool; BITS_PER_DIGIT]> {
    DIGIT_CODES.get(usize::from(digit)).copied()
}

/// Inverse of [`digit_code`]; `None` for the twelve unused bit patterns.
#[must_use]
pub fn code_digit(code: [bool; BITS_PER_DIGIT]) -> Option<u8> {
    DIGIT_CODES
        .iter()
        .position(|c| *c == code)
        .and_then(|d| u8::try_from(d).ok())
}

/// `(-1+i)^exponent`, exact for the exponents a block can hold.
#[must_use]
pub fn base_power(exponent: i32) -> Complex64 {
    let quarter = exponent.div_euclid(4);
    let rest = exponent.rem_euclid(4) as usize;
    BASE_POWERS[rest] * (-4.0f64).powi(quarter)
}

/// Converts between real scalars and digit blocks for one layout.
#[derive(Debug, Clone, Copy)]
pub struct NumeralCodec {
    config: EncoderConfig,
}

impl NumeralCodec {
    /// Create a codec after validating the layout.
    pub fn new(config: EncoderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The digit layout.
    #[must_use]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Normalized digits of `value`, most significant first.
    ///
    /// Fractional digits beyond the configured count are truncated
    /// toward zero.
    pub fn digits(&self, value: f64) -> Result<Vec<u8>> {
        if !value.is_finite() {
            return Err(CnfxError::range(value, "not a finite number"));
        }

        let int_digits = self.config.integer_digits as usize;
        let frac_digits = self.config.fractional_digits as usize;
        let magnitude = value.abs();
        let int_part = magnitude.trunc();
        let limit = 4f64.powi(self.config.integer_digits as i32);
        if int_part >= limit {
            return Err(CnfxError::range(
                value,
                format!("integer part needs more than {int_digits} base-4 digits"),
            ));
        }

        // Unsigned base-4 digits, least significant first, starting at 4^-F.
        let mut signed = Vec::with_capacity(int_digits + frac_digits + 4);
        let mut fraction = magnitude - int_part;
        let mut fraction_digits = Vec::with_capacity(frac_digits);
        for _ in 0..frac_digits {
            fraction *= 4.0;
            let digit = fraction.floor();
            fraction -= digit;
            fraction_digits.push(digit as i64);
        }
        signed.extend(fraction_digits.into_iter().rev());
        let mut whole = int_part as i64;
        for _ in 0..int_digits {
            signed.push(whole % 4);
            whole /= 4;
        }

        let sign = if value < 0.0 { -1 } else { 1 };
        for (j, digit) in signed.iter_mut().enumerate() {
            let k = j as i64 - frac_digits as i64;
            *digit *= if k.rem_euclid(2) == 1 { -sign } else { sign };
        }

        normalize(&mut signed, value)?;

        let total = int_digits + frac_digits;
        if signed[total..].iter().any(|&d| d != 0) {
            return Err(CnfxError::range(
                value,
                format!("does not fit {int_digits} integer digits"),
            ));
        }

        Ok(signed[..total]
            .iter()
            .rev()
            .map(|&d| d as u8)
            .collect())
    }

    /// Bit pattern of `value`, most significant bit first.
    pub fn encode(&self, value: f64) -> Result<Vec<bool>> {
        let digits = self.digits(value)?;
        let mut bits = Vec::with_capacity(self.config.block_len());
        for digit in digits {
            bits.extend_from_slice(&DIGIT_CODES[usize::from(digit)]);
        }
        Ok(bits)
    }

    /// Positional value of a bit pattern in base `-1+i`.
    ///
    /// Any bit pattern decodes; patterns outside the digit code table
    /// yield values with a nonzero imaginary part.
    #[must_use]
    pub fn decode(&self, bits: &[bool]) -> Complex64 {
        let top = (BITS_PER_DIGIT as i32) * (self.config.integer_digits as i32) - 1;
        bits.iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .map(|(j, _)| base_power(top - j as i32))
            .sum()
    }

    /// Value of normalized digits, most significant first.
    #[must_use]
    pub fn decode_digits(&self, digits: &[u8]) -> f64 {
        let top = self.config.integer_digits as i32 - 1;
        digits
            .iter()
            .enumerate()
            .map(|(j, &d)| f64::from(d) * (-4.0f64).powi(top - j as i32))
            .sum()
    }

    /// Smallest and largest representable values.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        let mut low = 0.0;
        let mut high = 0.0;
        let frac = self.config.fractional_digits as i32;
        for k in -frac..self.config.integer_digits as i32 {
            let weight = 3.0 * (-4.0f64).powi(k);
            if weight > 0.0 {
                high += weight;
            } else {
                low += weight;
            }
        }
        (low, high)
    }

    /// Distance between adjacent representable values.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        4f64.powi(-(self.config.fractional_digits as i32))
    }
}

/// Bring every digit into `0..4`, growing the vector for carries.
fn normalize(digits: &mut Vec<i64>, value: f64) -> Result<()> {
    let max_passes = 4 * (digits.len() + 8);
    for _ in 0..max_passes {
        let mut changed = false;
        let mut j = 0;
        while j < digits.len() {
            let adjust = if digits[j] < 0 {
                1
            } else if digits[j] >= 4 {
                -1
            } else {
                0
            };
            if adjust != 0 {
                // (-4)^(k+1) = -4 * (-4)^k
                digits[j] += 4 * adjust;
                if j + 1 == digits.len() {
                    digits.push(0);
                }
                digits[j + 1] += adjust;
                changed = true;
            }
            j += 1;
        }
        if !changed {
            return Ok(());
        }
    }
    Err(CnfxError::range(value, "digit normalization did not settle"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codec(integer: u32, fractional: u32) -> NumeralCodec {
        NumeralCodec::new(EncoderConfig::new(integer).with_fractional_digits(fractional)).unwrap()
    }

    #[test]
    fn test_digit_codes() {
        assert_eq!(digit_code(2), Some([true, true, false, false]));
        assert_eq!(digit_code(4), None);
        assert_eq!(code_digit([true, true, false, true]), Some(3));
        assert_eq!(code_digit([false, true, false, false]), None);
    }

    #[test]
    fn test_base_powers() {
        assert_eq!(base_power(4), Complex64::new(-4.0, 0.0));
        assert_eq!(base_power(-4), Complex64::new(-0.25, 0.0));
        assert_eq!(base_power(5), Complex64::new(4.0, -4.0));
        assert_eq!(base_power(2) * base_power(2), base_power(4));
    }

    #[test]
    fn test_small_constants() {
        let c = codec(3, 0);
        assert_eq!(c.digits(0.0).unwrap(), vec![0, 0, 0]);
        assert_eq!(c.digits(3.0).unwrap(), vec![0, 0, 3]);
        // 4 = 1*16 + 3*(-4) + 0
        assert_eq!(c.digits(4.0).unwrap(), vec![1, 3, 0]);
        // -1 = 1*(-4) + 3
        assert_eq!(c.digits(-1.0).unwrap(), vec![0, 1, 3]);
        assert_eq!(
            c.encode(1.0).unwrap(),
            vec![
                false, false, false, false, false, false, false, false, false, false, false,
                true
            ]
        );
    }

    #[test]
    fn test_width_three_range() {
        let c = codec(3, 0);
        assert_eq!(c.range(), (-12.0, 51.0));
        for v in -12..=51 {
            let decoded = c.decode(&c.encode(f64::from(v)).unwrap());
            assert_eq!(decoded, Complex64::new(f64::from(v), 0.0), "value {v}");
        }
    }

    #[test]
    fn test_out_of_range() {
        let c = codec(3, 0);
        for v in [-13.0, 52.0, 60.0, -20.0, 1e6] {
            assert!(
                matches!(c.encode(v), Err(CnfxError::EncodingRange { .. })),
                "value {v}"
            );
        }
        assert!(c.encode(f64::NAN).is_err());
        assert!(c.encode(f64::INFINITY).is_err());
        assert!(c.encode(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_fixed_point_constants() {
        let c = codec(1, 1);
        assert_eq!(c.resolution(), 0.25);
        assert_eq!(c.decode(&c.encode(std::f64::consts::E).unwrap()).re, 2.5);
        assert_eq!(c.decode(&c.encode(std::f64::consts::PI).unwrap()).re, 3.0);
        assert_eq!(c.decode(&c.encode(0.25).unwrap()).re, 0.25);
        assert_eq!(c.decode(&c.encode(-0.5).unwrap()).re, -0.5);
        assert_eq!(c.decode(&c.encode(1.75).unwrap()).re, 1.75);
        assert!(c.encode(-2.0).is_err());
    }

    #[test]
    fn test_decode_digits_matches_bits() {
        let c = codec(2, 2);
        let digits = c.digits(2.3).unwrap();
        let bits = c.encode(2.3).unwrap();
        let value = c.decode(&bits);
        assert_eq!(value.im, 0.0);
        assert_eq!(value.re, c.decode_digits(&digits));
    }

    #[test]
    fn test_wide_fixed_point_round_trip() {
        let c = codec(12, 12);
        assert_eq!(c.config().block_len(), 96);
        for v in [-98765.0 - 1.0 / 4096.0, 1234.5 + 3.0 / 16_777_216.0, 3.0 * 4f64.powi(10)] {
            let decoded = c.decode(&c.encode(v).unwrap());
            assert_eq!(decoded, Complex64::new(v, 0.0), "value {v}");
        }
    }

    #[test]
    fn test_widest_integer_layout() {
        let c = codec(26, 0);
        let v = 3.0 * 4f64.powi(24) + 5.0;
        assert_eq!(c.decode(&c.encode(v).unwrap()), Complex64::new(v, 0.0));
    }

    proptest! {
        #[test]
        fn prop_integer_roundtrip(v in -204i32..=819) {
            let c = codec(5, 0);
            let decoded = c.decode(&c.encode(f64::from(v)).unwrap());
            prop_assert_eq!(decoded, Complex64::new(f64::from(v), 0.0));
        }

        #[test]
        fn prop_fixed_point_roundtrip(n in -204i32..=51) {
            // Every multiple of 1/16 in [-12.75, 3.1875].
            let c = codec(2, 2);
            let v = f64::from(n) / 16.0;
            let decoded = c.decode(&c.encode(v).unwrap());
            prop_assert_eq!(decoded, Complex64::new(v, 0.0));
        }

        #[test]
        fn prop_truncation_error_bounded(v in -12.0f64..51.0) {
            let c = codec(2, 2);
            if let Ok(bits) = c.encode(v) {
                let decoded = c.decode(&bits);
                prop_assert!(decoded.im == 0.0);
                prop_assert!((decoded.re - v).abs() < c.resolution());
            }
        }
    }
}
