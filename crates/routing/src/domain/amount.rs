//! Exact token amounts.
//!
//! An [`Amount`] is a rational number of raw token units (wei for 18 decimal
//! tokens) bound to the token it counts. Arithmetic never rounds; rounding
//! only happens when rendering with [`Amount::to_fixed`] or
//! [`Amount::to_significant`].

use {
    crate::domain::eth::{Token, U256},
    num::{BigInt, BigRational, Signed, Zero},
    number::conversions::{
        big_int_to_u256,
        big_rational_floor,
        big_rational_to_big_decimal,
        pow10,
        u256_to_big_int,
    },
    std::{cmp::Ordering, fmt},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("mismatched assets {left} and {right}")]
    MismatchedAsset { left: Box<Token>, right: Box<Token> },
    #[error("invalid precision {0}")]
    InvalidPrecision(u32),
    #[error("division by zero")]
    DivisionByZero,
}

impl Error {
    pub(crate) fn mismatch(left: &Token, right: &Token) -> Self {
        Self::MismatchedAsset {
            left: Box::new(left.clone()),
            right: Box::new(right.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amount {
    token: Token,
    raw: BigRational,
}

impl Amount {
    pub fn from_raw(token: Token, raw: impl Into<BigInt>) -> Self {
        Self {
            token,
            raw: BigRational::from_integer(raw.into()),
        }
    }

    pub fn from_u256(token: Token, raw: U256) -> Self {
        Self::from_raw(token, u256_to_big_int(&raw))
    }

    pub fn from_fraction(
        token: Token,
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, Error> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self {
            token,
            raw: BigRational::new(numerator.into(), denominator),
        })
    }

    pub(crate) fn from_ratio(token: Token, raw: BigRational) -> Self {
        Self { token, raw }
    }

    pub fn zero(token: Token) -> Self {
        Self::from_raw(token, 0)
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The exact amount in raw token units.
    pub fn raw(&self) -> &BigRational {
        &self.raw
    }

    /// Whole raw units, rounded down.
    pub fn quotient(&self) -> BigInt {
        big_rational_floor(&self.raw)
    }

    /// Whole raw units as a `U256`; `None` for negative amounts or on
    /// overflow.
    pub fn to_u256(&self) -> Option<U256> {
        big_int_to_u256(&self.quotient())
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.raw.is_negative()
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, Error> {
        self.ensure_same_token(other)?;
        Ok(Self::from_ratio(self.token.clone(), &self.raw + &other.raw))
    }

    pub fn subtract(&self, other: &Amount) -> Result<Amount, Error> {
        self.ensure_same_token(other)?;
        Ok(Self::from_ratio(self.token.clone(), &self.raw - &other.raw))
    }

    pub fn multiply(&self, factor: &BigRational) -> Amount {
        Self::from_ratio(self.token.clone(), &self.raw * factor)
    }

    pub fn divide(&self, divisor: &BigRational) -> Result<Amount, Error> {
        if divisor.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::from_ratio(self.token.clone(), &self.raw / divisor))
    }

    /// Compares two amounts of the same token.
    pub fn checked_cmp(&self, other: &Amount) -> Result<Ordering, Error> {
        self.ensure_same_token(other)?;
        Ok(self.raw.cmp(&other.raw))
    }

    /// The smaller of two amounts of the same token.
    pub fn min(self, other: Amount) -> Result<Amount, Error> {
        Ok(match self.checked_cmp(&other)? {
            Ordering::Greater => other,
            Ordering::Less | Ordering::Equal => self,
        })
    }

    /// Whole raw units rendered in token units without trailing zeros.
    pub fn to_exact(&self) -> String {
        trim_fraction(render(&self.raw.to_integer(), self.decimals()))
    }

    /// Token units rounded half up to exactly `places` fractional digits.
    pub fn to_fixed(&self, places: u32) -> Result<String, Error> {
        if places > self.decimals() {
            return Err(Error::InvalidPrecision(places));
        }
        let scaled = self.units() * BigRational::from_integer(pow10(places));
        Ok(render(&round_half_up(&scaled), places))
    }

    /// Token units rounded half up to `digits` significant digits.
    pub fn to_significant(&self, digits: u32) -> Result<String, Error> {
        if digits == 0 {
            return Err(Error::InvalidPrecision(digits));
        }
        let units = self.units();
        if units.is_zero() {
            return Ok("0".to_string());
        }

        let shift = i64::from(digits) - 1 - exponent(&units.abs());
        let scale = BigRational::from_integer(pow10(shift.unsigned_abs() as u32));
        if shift >= 0 {
            let rounded = round_half_up(&(units * scale));
            Ok(trim_fraction(render(&rounded, shift as u32)))
        } else {
            let rounded = round_half_up(&(units / &scale)) * scale.to_integer();
            Ok(rounded.to_string())
        }
    }

    fn decimals(&self) -> u32 {
        u32::from(self.token.decimals)
    }

    /// The amount in token units, i.e. divided by `10^decimals`.
    fn units(&self) -> BigRational {
        &self.raw / BigRational::from_integer(pow10(self.decimals()))
    }

    fn ensure_same_token(&self, other: &Amount) -> Result<(), Error> {
        if self.token != other.token {
            return Err(Error::mismatch(&self.token, &other.token));
        }
        Ok(())
    }
}

impl PartialOrd for Amount {
    /// Amounts of different tokens are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.checked_cmp(other).ok()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_exact(), self.token.symbol)
    }
}

/// A ratio used for slippage tolerances and splits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(BigRational);

impl Percent {
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Result<Self, Error> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self(BigRational::new(numerator.into(), denominator)))
    }

    /// Basis points, 1 bps being 0.01%.
    pub fn from_bps(bps: u32) -> Self {
        Self(BigRational::new(bps.into(), 10_000.into()))
    }

    pub fn ratio(&self) -> &BigRational {
        &self.0
    }
}

/// Renders `units / 10^scale` with exactly `scale` fractional digits.
fn render(units: &BigInt, scale: u32) -> String {
    let value = BigRational::new(units.clone(), pow10(scale));
    big_rational_to_big_decimal(&value, scale).to_string()
}

fn trim_fraction(rendered: String) -> String {
    if !rendered.contains('.') {
        return rendered;
    }
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Rounds to the nearest integer, halves away from zero.
fn round_half_up(value: &BigRational) -> BigInt {
    let half = BigRational::new(1.into(), 2.into());
    let rounded = big_rational_floor(&(value.abs() + half));
    if value.is_negative() { -rounded } else { rounded }
}

/// Decimal exponent of a positive rational, `floor(log10(value))`.
fn exponent(value: &BigRational) -> i64 {
    let whole = value.to_integer();
    if !whole.is_zero() {
        return i64::try_from(whole.to_string().len()).unwrap_or(i64::MAX) - 1;
    }
    let ten = BigRational::from_integer(10.into());
    let one = BigRational::from_integer(1.into());
    let mut exponent = -1;
    let mut scaled = value * &ten;
    while scaled < one {
        scaled *= &ten;
        exponent -= 1;
    }
    exponent
}
