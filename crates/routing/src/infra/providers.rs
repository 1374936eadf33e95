//! Interfaces of the external collaborators feeding a quoting session.

use {
    crate::domain::{
        gas::l1::L2GasConstants,
        pool::{ConcentratedPool, FeeTier, TokenPair},
    },
    chain::Chain,
};

/// Identifies a concentrated liquidity pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolKey {
    pub tokens: TokenPair,
    pub fee: FeeTier,
}

impl PoolKey {
    pub fn matches(&self, pool: &ConcentratedPool) -> bool {
        pool.tokens == self.tokens && pool.fee == self.fee
    }
}

/// Source of synced pool state.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait PoolProviding: Send + Sync {
    /// Returns snapshots of the pools among `keys` that exist. Pools that do
    /// not exist are left out of the result.
    async fn concentrated_pools(&self, keys: &[PoolKey]) -> anyhow::Result<Vec<ConcentratedPool>>;
}

/// Reads the L1 data fee constants from a rollup's gas price oracle.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait L2GasConstantsProviding: Send + Sync {
    async fn fetch(&self, chain: Chain) -> anyhow::Result<L2GasConstants>;
}
