//! Reference pools used to convert gas costs out of the native token.

use {
    crate::{
        domain::{
            eth::{H160, Token},
            pool::{self, ConcentratedPool, FeeTier, TokenPair},
            price::Price,
        },
        infra::{
            providers::{PoolKey, PoolProviding},
            tokens,
        },
    },
    chain::Chain,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no USD reference pool on {0:?}")]
    NoUsdReferencePool(Chain),
    #[error("token {0} is not on a supported chain")]
    UnsupportedChain(Box<Token>),
    #[error("reference pool {0:?} cannot price the native token")]
    InvalidReferencePool(H160),
    #[error("failed to fetch pools: {0:#}")]
    PoolFetch(anyhow::Error),
    #[error(transparent)]
    Pool(#[from] pool::Error),
}

/// Reference prices of a quoting session. Built once in the session's
/// setup phase and shared read-only by every route priced in it.
#[derive(Clone, Debug)]
pub struct PricingContext {
    chain: Chain,
    native: Token,
    quote_token: Token,
    amount_token: Token,
    usd_token: Token,
    usd_price: Price,
    native_quote_price: Option<Price>,
    native_amount_price: Option<Price>,
}

impl PricingContext {
    /// Assembles a context from already selected reference pools. The pools
    /// must contain the chain's wrapped native token and the matching
    /// counterpart.
    pub fn new(
        chain: Chain,
        quote_token: Token,
        amount_token: Token,
        usd_pool: ConcentratedPool,
        native_quote_pool: Option<ConcentratedPool>,
        native_amount_pool: Option<ConcentratedPool>,
    ) -> Result<Self, Error> {
        let native = tokens::wrapped_native(chain).clone();
        let usd_price = usd_pool
            .price_of(&native)
            .ok_or(Error::InvalidReferencePool(usd_pool.address))?;
        let usd_token = usd_price.quote_token().clone();

        let native_price = |pool: Option<ConcentratedPool>, token: &Token| {
            pool.map(|pool| match pool.price_of(&native) {
                Some(price) if *price.quote_token() == token.wrapped() => Ok(price),
                _ => Err(Error::InvalidReferencePool(pool.address)),
            })
            .transpose()
        };
        let native_quote_price = native_price(native_quote_pool, &quote_token)?;
        let native_amount_price = native_price(native_amount_pool, &amount_token)?;

        Ok(Self {
            chain,
            native,
            quote_token,
            amount_token,
            usd_token,
            usd_price,
            native_quote_price,
            native_amount_price,
        })
    }

    /// Looks up the reference pools of a session concurrently.
    pub async fn resolve(
        chain: Chain,
        quote_token: Token,
        amount_token: Token,
        provider: &dyn PoolProviding,
    ) -> Result<Self, Error> {
        let (usd_pool, native_quote_pool, native_amount_pool) = futures::try_join!(
            usd_pool(chain, provider),
            native_pool(chain, &quote_token, provider),
            native_pool(chain, &amount_token, provider),
        )?;
        Self::new(
            chain,
            quote_token,
            amount_token,
            usd_pool,
            native_quote_pool,
            native_amount_pool,
        )
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// The chain's wrapped native token gas is paid in.
    pub fn native(&self) -> &Token {
        &self.native
    }

    pub fn quote_token(&self) -> &Token {
        &self.quote_token
    }

    pub fn amount_token(&self) -> &Token {
        &self.amount_token
    }

    pub fn usd_token(&self) -> &Token {
        &self.usd_token
    }

    /// Native token priced in the USD token.
    pub fn usd_price(&self) -> &Price {
        &self.usd_price
    }

    /// Native token priced in the quote token, if a reference pool exists.
    pub fn native_quote_price(&self) -> Option<&Price> {
        self.native_quote_price.as_ref()
    }

    /// Native token priced in the amount token, if a reference pool exists.
    pub fn native_amount_price(&self) -> Option<&Price> {
        self.native_amount_price.as_ref()
    }
}

/// Finds the deepest pool pairing the wrapped native token with one of the
/// chain's USD stablecoins. Not finding one is fatal for the session.
pub async fn usd_pool(
    chain: Chain,
    provider: &dyn PoolProviding,
) -> Result<ConcentratedPool, Error> {
    let native = tokens::wrapped_native(chain);
    let keys = FeeTier::SCAN_ORDER
        .into_iter()
        .flat_map(|fee| {
            tokens::usd_tokens(chain).iter().map(move |usd| -> Result<_, Error> {
                Ok(PoolKey {
                    tokens: TokenPair::new(native.clone(), usd.clone())?,
                    fee,
                })
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let pools = provider
        .concentrated_pools(&keys)
        .await
        .map_err(Error::PoolFetch)?;
    let pool = deepest(&keys, &pools).ok_or(Error::NoUsdReferencePool(chain))?;
    tracing::debug!(?chain, address = ?pool.address, fee = %pool.fee, "USD reference pool");
    Ok(pool.clone())
}

/// Finds the deepest pool pairing `token` with the wrapped native token.
/// Returns `None` when `token` is the native token itself or when no such
/// pool exists.
pub async fn native_pool(
    chain: Chain,
    token: &Token,
    provider: &dyn PoolProviding,
) -> Result<Option<ConcentratedPool>, Error> {
    if token.chain_id != chain.id() {
        return Err(Error::UnsupportedChain(Box::new(token.clone())));
    }
    let native = tokens::wrapped_native(chain);
    let token = token.wrapped();
    if token == *native {
        return Ok(None);
    }

    let tokens = TokenPair::new(native.clone(), token.clone())?;
    let keys = FeeTier::SCAN_ORDER
        .into_iter()
        .map(|fee| PoolKey {
            tokens: tokens.clone(),
            fee,
        })
        .collect::<Vec<_>>();

    let pools = provider
        .concentrated_pools(&keys)
        .await
        .map_err(Error::PoolFetch)?;
    let pool = deepest(&keys, &pools).cloned();
    match &pool {
        Some(pool) => {
            tracing::debug!(%token, address = ?pool.address, fee = %pool.fee, "native reference pool")
        }
        None => tracing::info!(%token, "no native reference pool"),
    }
    Ok(pool)
}

/// The pool with the most liquidity, scanning `pools` in `keys` order.
/// Ties keep the pool found first.
fn deepest<'a>(keys: &[PoolKey], pools: &'a [ConcentratedPool]) -> Option<&'a ConcentratedPool> {
    keys.iter()
        .filter_map(|key| pools.iter().find(|pool| key.matches(pool)))
        .reduce(|best, pool| {
            if pool.liquidity > best.liquidity {
                pool
            } else {
                best
            }
        })
}
