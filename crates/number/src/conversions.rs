//! Conversion utilities between fixed-width and arbitrary precision numbers.

use {
    bigdecimal::BigDecimal,
    num::{BigInt, BigRational, BigUint, Integer, Signed, Zero, bigint::Sign},
    primitive_types::U256,
};

pub fn biguint_to_u256(i: &BigUint) -> Option<U256> {
    let bytes = i.to_bytes_be();
    if bytes.len() > 32 {
        return None;
    }
    Some(U256::from_big_endian(&bytes))
}

pub fn u256_to_biguint(i: &U256) -> BigUint {
    let mut bytes = [0_u8; 32];
    i.to_big_endian(&mut bytes);
    BigUint::from_bytes_be(&bytes)
}

pub fn u256_to_big_int(i: &U256) -> BigInt {
    BigInt::from_biguint(Sign::Plus, u256_to_biguint(i))
}

/// Converts a `BigInt` into a `U256`. Returns `None` for negative values and
/// for values that do not fit into 256 bits.
pub fn big_int_to_u256(i: &BigInt) -> Option<U256> {
    if i.is_negative() {
        return None;
    }
    biguint_to_u256(i.magnitude())
}

pub fn u256_to_big_rational(i: &U256) -> BigRational {
    BigRational::from_integer(u256_to_big_int(i))
}

/// Rounds a rational towards negative infinity.
pub fn big_rational_floor(r: &BigRational) -> BigInt {
    r.numer().div_floor(r.denom())
}

/// Converts a non-negative rational into a `U256` by flooring. Returns `None`
/// for negative values or on overflow.
pub fn big_rational_to_u256(r: &BigRational) -> Option<U256> {
    big_int_to_u256(&big_rational_floor(r))
}

/// Represents a rational as a `BigDecimal` with the given number of
/// fractional digits, rounding towards zero.
pub fn big_rational_to_big_decimal(r: &BigRational, scale: u32) -> BigDecimal {
    let factor = BigInt::from(10).pow(scale);
    let scaled = (r.numer() * factor) / r.denom();
    BigDecimal::new(scaled, i64::from(scale))
}

/// Returns `10^exp` as a `BigInt`.
pub fn pow10(exp: u32) -> BigInt {
    BigInt::from(10).pow(exp)
}

/// Whether the rational is exactly zero.
pub fn is_zero(r: &BigRational) -> bool {
    r.numer().is_zero()
}
