use {
    crate::domain::{
        amount::{self, Amount},
        eth::Token,
    },
    num::{BigRational, Zero},
    number::conversions::pow10,
};

/// Exchange rate between two tokens in raw units: how many raw `quote`
/// units one raw `base` unit is worth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Price {
    base: Token,
    quote: Token,
    ratio: BigRational,
}

impl Price {
    pub fn new(base: Token, quote: Token, ratio: BigRational) -> Self {
        Self { base, quote, ratio }
    }

    /// The price at which `base` was exchanged for `quote`.
    pub fn from_amounts(base: &Amount, quote: &Amount) -> Result<Self, amount::Error> {
        if base.is_zero() {
            return Err(amount::Error::DivisionByZero);
        }
        Ok(Self::new(
            base.token().clone(),
            quote.token().clone(),
            quote.raw() / base.raw(),
        ))
    }

    pub fn base(&self) -> &Token {
        &self.base
    }

    pub fn quote_token(&self) -> &Token {
        &self.quote
    }

    pub fn ratio(&self) -> &BigRational {
        &self.ratio
    }

    /// Converts an amount of the base token into the quote token.
    pub fn quote(&self, amount: &Amount) -> Result<Amount, amount::Error> {
        if *amount.token() != self.base {
            return Err(amount::Error::mismatch(amount.token(), &self.base));
        }
        Ok(Amount::from_ratio(
            self.quote.clone(),
            amount.raw() * &self.ratio,
        ))
    }

    pub fn invert(&self) -> Result<Price, amount::Error> {
        if self.ratio.is_zero() {
            return Err(amount::Error::DivisionByZero);
        }
        Ok(Self::new(
            self.quote.clone(),
            self.base.clone(),
            self.ratio.recip(),
        ))
    }

    /// The rate in whole token units, e.g. USDC per ETH rather than raw USDC
    /// units per wei.
    pub fn adjusted(&self) -> BigRational {
        let base = BigRational::from_integer(pow10(u32::from(self.base.decimals)));
        let quote = BigRational::from_integer(pow10(u32::from(self.quote.decimals)));
        &self.ratio * base / quote
    }
}
