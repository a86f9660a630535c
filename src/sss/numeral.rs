use num_bigint::BigUint;
use thiserror::Error;

use super::field::PrimeField;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("numeral is empty")]
    Empty,
    #[error("invalid digit {character:?} at position {position}")]
    InvalidDigit { character: char, position: usize },
    #[error("digit {digit} out of range for base {base}")]
    DigitOutOfRange { digit: u32, base: u32 },
    #[error("base {0} is not supported, expected a base between 2 and 16")]
    UnsupportedBase(u32),
}

/// Decodes `numeral` in `base` into its residue modulo the field's modulus.
///
/// Digits are consumed from the least significant one, with both the running sum
/// and the power of the base reduced at each step, so arbitrarily long numerals never
/// overflow. For values at or above the modulus only the residue is returned.
pub fn decode_modular(numeral: &str, base: u32, field: &PrimeField) -> Result<u64, DecodeError> {
    let digits = digit_values(numeral, base)?;

    let mut result = 0;
    let mut power = field.reduce(1);
    for digit in digits.into_iter().rev() {
        result = field.add(result, field.mul(digit.into(), power));
        power = field.mul(power, base.into());
    }
    Ok(result)
}

/// Decodes `numeral` in `base` into an arbitrary precision integer.
pub fn decode(numeral: &str, base: u32) -> Result<BigUint, DecodeError> {
    let digits = digit_values(numeral, base)?;

    let mut result = BigUint::ZERO;
    let mut power = BigUint::from(1_u8);
    for digit in digits.into_iter().rev() {
        result += &power * digit;
        power *= base;
    }
    Ok(result)
}

/// Validates every character of `numeral` and returns the digit values, most significant first.
fn digit_values(numeral: &str, base: u32) -> Result<Vec<u32>, DecodeError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(DecodeError::UnsupportedBase(base));
    }
    if numeral.is_empty() {
        return Err(DecodeError::Empty);
    }

    numeral
        .chars()
        .enumerate()
        .map(|(position, character)| {
            let digit = character
                .to_digit(16)
                .ok_or(DecodeError::InvalidDigit {
                    character,
                    position,
                })?;
            if digit >= base {
                return Err(DecodeError::DigitOutOfRange { digit, base });
            }
            Ok(digit)
        })
        .collect()
}
