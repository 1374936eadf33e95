//! Totals of a chosen set of priced routes.

use {
    crate::domain::{
        amount::{self, Amount},
        eth::Gas,
        gas::{self, GasModel, L1GasCosts},
        quote::{RouteWithValidQuote, TradeType},
    },
    std::cmp::Ordering,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a swap route needs at least one route")]
    NoRoutes,
    #[error("{expected} swap route cannot contain an {actual} route")]
    TradeTypeMismatch {
        expected: TradeType,
        actual: TradeType,
    },
    #[error(transparent)]
    Gas(#[from] gas::Error),
    #[error(transparent)]
    Amount(#[from] amount::Error),
}

/// The routes a trade is split across, with their combined quote and gas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapRoute {
    pub trade_type: TradeType,
    /// Sorted by descending split amount.
    pub routes: Vec<RouteWithValidQuote>,
    pub quote: Amount,
    /// Includes the L1 data fee on chains that charge one.
    pub quote_gas_adjusted: Amount,
    /// Execution gas of every route plus the L1 gas of the transaction.
    pub estimated_gas_used: Gas,
    pub estimated_gas_used_usd: Amount,
    pub estimated_gas_used_quote_token: Amount,
    pub l1: L1GasCosts,
    /// `false` if the gas of any route could not be converted into the
    /// quote token.
    pub gas_accounted: bool,
}

impl SwapRoute {
    pub fn from_routes(
        mut routes: Vec<RouteWithValidQuote>,
        trade_type: TradeType,
        gas_model: &GasModel,
    ) -> Result<Self, Error> {
        let Some(first) = routes.first() else {
            return Err(Error::NoRoutes);
        };
        if let Some(route) = routes.iter().find(|route| route.trade_type() != trade_type) {
            return Err(Error::TradeTypeMismatch {
                expected: trade_type,
                actual: route.trade_type(),
            });
        }

        let mut quote = Amount::zero(first.raw_quote().token().clone());
        let mut quote_gas_adjusted = quote.clone();
        let mut gas_cost_quote = quote.clone();
        let mut gas_cost_usd = Amount::zero(first.gas_cost_in_usd().token().clone());
        let mut gas_used = Gas::default();
        let mut gas_accounted = true;
        for route in &routes {
            quote = quote.add(route.raw_quote())?;
            quote_gas_adjusted = quote_gas_adjusted.add(route.quote_adjusted_for_gas())?;
            gas_cost_quote = gas_cost_quote.add(route.gas_cost_in_quote())?;
            gas_cost_usd = gas_cost_usd.add(route.gas_cost_in_usd())?;
            gas_used = gas_used + route.gas_estimate();
            gas_accounted &= route.gas_accounted();
        }

        // The L1 data fee is paid once per transaction, not per route.
        let l1 = gas_model.l1_costs(&routes)?;
        let quote_gas_adjusted = match trade_type {
            TradeType::ExactInput => quote_gas_adjusted.subtract(&l1.cost_l1_quote)?,
            TradeType::ExactOutput => quote_gas_adjusted.add(&l1.cost_l1_quote)?,
        };

        routes.sort_by(|a, b| {
            b.amount()
                .partial_cmp(a.amount())
                .unwrap_or(Ordering::Equal)
        });

        tracing::debug!(
            %trade_type,
            routes = routes.len(),
            %quote,
            %quote_gas_adjusted,
            %gas_used,
            l1_gas = %l1.gas_used_l1,
            "assembled swap route"
        );
        Ok(Self {
            trade_type,
            quote,
            quote_gas_adjusted,
            estimated_gas_used: gas_used + l1.gas_used_l1,
            estimated_gas_used_usd: gas_cost_usd.add(&l1.cost_l1_usd)?,
            estimated_gas_used_quote_token: gas_cost_quote.add(&l1.cost_l1_quote)?,
            routes,
            l1,
            gas_accounted,
        })
    }
}
