//! Read-only liquidity snapshots handed to the engine by the pool provider.

use {
    crate::domain::{
        eth::{H160, Token, U256},
        price::Price,
    },
    num::{BigInt, BigRational, Zero},
    number::conversions::u256_to_big_int,
    std::fmt,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("pool tokens must differ, got {0} twice")]
    IdenticalTokens(Box<Token>),
    #[error("pool tokens {0} and {1} live on different chains")]
    ChainMismatch(Box<Token>, Box<Token>),
    #[error("pools hold ERC20 tokens only, got {0}")]
    NativeToken(Box<Token>),
    #[error("unsupported fee tier {0}")]
    UnsupportedFeeTier(u32),
}

/// Concentrated liquidity fee tiers in hundredths of a basis point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum FeeTier {
    Lowest = 100,
    Low = 500,
    Medium = 3000,
    High = 10000,
}

impl FeeTier {
    /// Order in which tiers are scanned for reference pools.
    pub const SCAN_ORDER: [FeeTier; 4] = [Self::High, Self::Medium, Self::Low, Self::Lowest];

    pub fn pips(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::SCAN_ORDER
            .into_iter()
            .find(|tier| tier.pips() == value)
            .ok_or(Error::UnsupportedFeeTier(value))
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pips())
    }
}

/// Token pair of a pool, sorted by address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
    token0: Token,
    token1: Token,
}

impl TokenPair {
    /// Sorts the two tokens. Fails for native markers, identical tokens and
    /// tokens of different chains.
    pub fn new(a: Token, b: Token) -> Result<Self, Error> {
        for token in [&a, &b] {
            if token.is_native() {
                return Err(Error::NativeToken(Box::new(token.clone())));
            }
        }
        if a == b {
            return Err(Error::IdenticalTokens(Box::new(a)));
        }
        if a.chain_id != b.chain_id {
            return Err(Error::ChainMismatch(Box::new(a), Box::new(b)));
        }
        Ok(if a.sorts_before(&b) {
            Self { token0: a, token1: b }
        } else {
            Self { token0: b, token1: a }
        })
    }

    pub fn token0(&self) -> &Token {
        &self.token0
    }

    pub fn token1(&self) -> &Token {
        &self.token1
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.token0 == *token || self.token1 == *token
    }

    /// The token on the other side of `token`.
    pub fn other(&self, token: &Token) -> Option<&Token> {
        if self.token0 == *token {
            Some(&self.token1)
        } else if self.token1 == *token {
            Some(&self.token0)
        } else {
            None
        }
    }

    /// Builds the price of `token` from the pool's `token0` price.
    fn price_of(&self, token: &Token, token0_price: BigRational) -> Option<Price> {
        if self.token0 == *token {
            Some(Price::new(self.token0.clone(), self.token1.clone(), token0_price))
        } else if self.token1 == *token {
            if token0_price.is_zero() {
                return None;
            }
            Some(Price::new(
                self.token1.clone(),
                self.token0.clone(),
                token0_price.recip(),
            ))
        } else {
            None
        }
    }
}

/// A constant product pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplePool {
    pub address: H160,
    pub tokens: TokenPair,
    pub reserve0: U256,
    pub reserve1: U256,
}

impl SimplePool {
    /// Creates a pool from its two `(token, reserve)` sides in any order.
    pub fn new(address: H160, a: (Token, U256), b: (Token, U256)) -> Result<Self, Error> {
        let tokens = TokenPair::new(a.0.clone(), b.0)?;
        let (reserve0, reserve1) = if tokens.token0 == a.0 {
            (a.1, b.1)
        } else {
            (b.1, a.1)
        };
        Ok(Self {
            address,
            tokens,
            reserve0,
            reserve1,
        })
    }

    /// Mid price of `token` in terms of the other pool token:
    /// `reserve1 / reserve0` for `token0`.
    pub fn price_of(&self, token: &Token) -> Option<Price> {
        if self.reserve0.is_zero() {
            return None;
        }
        let token0_price = BigRational::new(
            u256_to_big_int(&self.reserve1),
            u256_to_big_int(&self.reserve0),
        );
        self.tokens.price_of(token, token0_price)
    }
}

/// A concentrated liquidity pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConcentratedPool {
    pub address: H160,
    pub tokens: TokenPair,
    pub fee: FeeTier,
    /// In-range liquidity.
    pub liquidity: u128,
    pub sqrt_price_x96: U256,
}

impl ConcentratedPool {
    pub fn new(
        address: H160,
        a: Token,
        b: Token,
        fee: FeeTier,
        liquidity: u128,
        sqrt_price_x96: U256,
    ) -> Result<Self, Error> {
        Ok(Self {
            address,
            tokens: TokenPair::new(a, b)?,
            fee,
            liquidity,
            sqrt_price_x96,
        })
    }

    /// Mid price of `token` in terms of the other pool token:
    /// `sqrtPriceX96² / 2¹⁹²` for `token0`.
    pub fn price_of(&self, token: &Token) -> Option<Price> {
        let sqrt_price = u256_to_big_int(&self.sqrt_price_x96);
        let token0_price = BigRational::new(&sqrt_price * &sqrt_price, BigInt::from(1) << 192);
        self.tokens.price_of(token, token0_price)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Simple,
    Concentrated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pool {
    Simple(SimplePool),
    Concentrated(ConcentratedPool),
}

impl Pool {
    pub fn kind(&self) -> PoolKind {
        match self {
            Self::Simple(_) => PoolKind::Simple,
            Self::Concentrated(_) => PoolKind::Concentrated,
        }
    }

    pub fn address(&self) -> H160 {
        match self {
            Self::Simple(pool) => pool.address,
            Self::Concentrated(pool) => pool.address,
        }
    }

    pub fn tokens(&self) -> &TokenPair {
        match self {
            Self::Simple(pool) => &pool.tokens,
            Self::Concentrated(pool) => &pool.tokens,
        }
    }

    pub fn as_simple(&self) -> Option<&SimplePool> {
        match self {
            Self::Simple(pool) => Some(pool),
            Self::Concentrated(_) => None,
        }
    }

    pub fn as_concentrated(&self) -> Option<&ConcentratedPool> {
        match self {
            Self::Concentrated(pool) => Some(pool),
            Self::Simple(_) => None,
        }
    }
}

impl From<SimplePool> for Pool {
    fn from(pool: SimplePool) -> Self {
        Self::Simple(pool)
    }
}

impl From<ConcentratedPool> for Pool {
    fn from(pool: ConcentratedPool) -> Self {
        Self::Concentrated(pool)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::domain::{amount::Amount, eth::TokenAddress},
        num::One,
    };

    fn token(id: u64) -> Token {
        Token {
            chain_id: 1,
            address: TokenAddress::Erc20(H160::from_low_u64_be(id)),
            decimals: 18,
            symbol: format!("T{id}"),
        }
    }

    #[test]
    fn sorts_tokens_and_reserves() {
        let pool = SimplePool::new(
            H160::repeat_byte(0xaa),
            (token(2), 200.into()),
            (token(1), 100.into()),
        )
        .unwrap();
        assert_eq!(pool.tokens.token0(), &token(1));
        assert_eq!(pool.reserve0, 100.into());
        assert_eq!(pool.reserve1, 200.into());
    }

    #[test]
    fn rejects_invalid_pairs() {
        assert!(matches!(
            TokenPair::new(token(1), token(1)),
            Err(Error::IdenticalTokens(_))
        ));
        let elsewhere = Token {
            chain_id: 10,
            ..token(2)
        };
        assert!(matches!(
            TokenPair::new(token(1), elsewhere),
            Err(Error::ChainMismatch(..))
        ));
        let native = Token {
            address: TokenAddress::Native,
            ..token(2)
        };
        assert!(matches!(
            TokenPair::new(token(1), native),
            Err(Error::NativeToken(_))
        ));
    }

    #[test]
    fn simple_mid_price() {
        let pool = SimplePool::new(
            H160::repeat_byte(0xaa),
            (token(1), 100.into()),
            (token(2), 250.into()),
        )
        .unwrap();
        let price = pool.price_of(&token(1)).unwrap();
        assert_eq!(price.ratio(), &BigRational::new(5.into(), 2.into()));
        let price = pool.price_of(&token(2)).unwrap();
        assert_eq!(price.ratio(), &BigRational::new(2.into(), 5.into()));
        assert!(pool.price_of(&token(3)).is_none());
    }

    #[test]
    fn concentrated_mid_price() {
        // sqrtPriceX96 = 2^96 * 2 prices token0 at 4 token1.
        let pool = ConcentratedPool::new(
            H160::repeat_byte(0xbb),
            token(1),
            token(2),
            FeeTier::Medium,
            1,
            U256::from(2) << 96,
        )
        .unwrap();
        let price = pool.price_of(&token(1)).unwrap();
        assert_eq!(price.ratio(), &BigRational::from_integer(4.into()));
        let quoted = pool
            .price_of(&token(2))
            .unwrap()
            .quote(&Amount::from_raw(token(2), 8))
            .unwrap();
        assert_eq!(quoted, Amount::from_raw(token(1), 2));
        assert!(BigRational::one() < *price.ratio());
    }

    #[test]
    fn fee_tiers() {
        assert_eq!(FeeTier::try_from(3000_u32).unwrap(), FeeTier::Medium);
        assert_eq!(FeeTier::try_from(42_u32), Err(Error::UnsupportedFeeTier(42)));
        assert_eq!(FeeTier::SCAN_ORDER[0].pips(), 10000);
    }
}
