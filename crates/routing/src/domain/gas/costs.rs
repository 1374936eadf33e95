//! Gas cost constants of the swap heuristics.

use chain::Chain;

/// Costs of swapping through constant product pools. They do not depend on
/// the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimpleCosts {
    pub base_swap: u64,
    pub per_extra_hop: u64,
}

pub const SIMPLE: SimpleCosts = SimpleCosts {
    base_swap: 135_000,
    per_extra_hop: 50_000,
};

impl SimpleCosts {
    /// `base + per_extra_hop * (hops - 1)`
    pub fn units(&self, hops: usize) -> u64 {
        let extra_hops = u64::try_from(hops.saturating_sub(1)).unwrap_or(u64::MAX);
        self.base_swap
            .saturating_add(self.per_extra_hop.saturating_mul(extra_hops))
    }
}

/// Costs of swapping through concentrated liquidity pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConcentratedCosts {
    pub base_swap: u64,
    pub per_hop: u64,
    pub per_initialized_tick: u64,
}

impl ConcentratedCosts {
    pub fn for_chain(chain: Chain) -> Self {
        let base_swap = match chain {
            Chain::ArbitrumOne => 5_000,
            Chain::Mainnet
            | Chain::Optimism
            | Chain::Bnb
            | Chain::Polygon
            | Chain::Base
            | Chain::Celo
            | Chain::CeloAlfajores
            | Chain::Sepolia => 2_000,
        };
        Self {
            base_swap,
            per_hop: 80_000,
            per_initialized_tick: 31_000,
        }
    }

    /// `base + per_hop * hops + per_tick * max(1, ticks)`. A swap always pays
    /// for at least one tick.
    pub fn units(&self, hops: usize, initialized_ticks: u64) -> u64 {
        let hops = u64::try_from(hops).unwrap_or(u64::MAX);
        self.base_swap
            .saturating_add(self.per_hop.saturating_mul(hops))
            .saturating_add(
                self.per_initialized_tick
                    .saturating_mul(initialized_ticks.max(1)),
            )
    }
}
