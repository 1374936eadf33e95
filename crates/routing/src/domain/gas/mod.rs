//! Gas estimation of candidate routes.
//!
//! A [`GasModel`] is built once per quoting session from the session's
//! reference prices and L2 constants and is then applied synchronously to
//! every candidate route.

pub mod costs;
pub mod l1;

use {
    self::{
        costs::ConcentratedCosts,
        l1::{DataFee, DataWeights, L2GasConstants},
    },
    crate::domain::{
        amount::{self, Amount, Percent},
        eth::{Gas, GasPrice, H160, U256},
        pool::PoolKind,
        price::Price,
        pricing::PricingContext,
        quote::{Candidate, RouteWithValidQuote},
        route::{Protocol, Route, Section},
        trade::{self, SubmissionStrategy, SwapOptions},
    },
    chain::{Chain, L1DataFee},
    num::{BigRational, One},
    number::conversions::u256_to_big_int,
    std::sync::Arc,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0:?} charges an L1 data fee but no L2 gas constants were supplied")]
    MissingL2GasConstants(Chain),
    #[error("OP stack fee scalar decimals {0} exceed {max}", max = l1::MAX_OP_STACK_DECIMALS)]
    L2GasConstantsDecimals(u32),
    #[error("{chain:?} does not charge {constants:?} style L1 data fees")]
    L2GasConstantsMismatch { chain: Chain, constants: L1DataFee },
    #[error("gas model for {model:?} cannot use reference prices of {context:?}")]
    ChainMismatch { model: Chain, context: Chain },
    #[error("no routes to charge an L1 data fee for")]
    NoRoutes,
    #[error("failed to encode call data for the L1 data fee: {0}")]
    CallData(#[source] Box<trade::Error>),
    #[error(transparent)]
    Amount(#[from] amount::Error),
}

/// Execution gas of one route and what it costs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GasCosts {
    pub gas_estimate: Gas,
    pub cost_in_quote: Amount,
    pub cost_in_usd: Amount,
    /// `false` when the cost could not be converted into the quote token and
    /// `cost_in_quote` is zero for that reason.
    pub gas_accounted: bool,
}

/// The L1 data fee of a transaction executing a set of routes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct L1GasCosts {
    pub gas_used_l1: Gas,
    pub fee_native: Amount,
    pub cost_l1_usd: Amount,
    pub cost_l1_quote: Amount,
}

impl L1GasCosts {
    fn zero(context: &PricingContext) -> Self {
        Self {
            gas_used_l1: Gas::default(),
            fee_native: Amount::zero(context.native().clone()),
            cost_l1_usd: Amount::zero(context.usd_token().clone()),
            cost_l1_quote: Amount::zero(context.quote_token().clone()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GasModel {
    chain: Chain,
    gas_price: GasPrice,
    context: Arc<PricingContext>,
    l2_constants: Option<L2GasConstants>,
    additional_overhead: Gas,
    data_weights: DataWeights,
}

/// Builds the gas model of a session. Chains that charge an L1 data fee
/// require constants of their fee family, other chains must not get any.
pub fn build_gas_model(
    chain: Chain,
    gas_price: GasPrice,
    context: Arc<PricingContext>,
    l2_constants: Option<L2GasConstants>,
) -> Result<GasModel, Error> {
    if context.chain() != chain {
        return Err(Error::ChainMismatch {
            model: chain,
            context: context.chain(),
        });
    }
    match (chain.l1_data_fee(), &l2_constants) {
        (None, None) => {}
        (Some(_), None) => return Err(Error::MissingL2GasConstants(chain)),
        (expected, Some(constants)) => {
            if expected != Some(constants.family()) {
                return Err(Error::L2GasConstantsMismatch {
                    chain,
                    constants: constants.family(),
                });
            }
            if let L2GasConstants::OpStack { decimals, .. } = constants {
                if *decimals > l1::MAX_OP_STACK_DECIMALS {
                    return Err(Error::L2GasConstantsDecimals(*decimals));
                }
            }
        }
    }

    Ok(GasModel {
        chain,
        gas_price,
        context,
        l2_constants,
        additional_overhead: Gas::default(),
        data_weights: DataWeights::default(),
    })
}

impl GasModel {
    /// Gas added to every route estimate on top of the heuristic.
    pub fn with_additional_overhead(self, additional_overhead: Gas) -> Self {
        Self {
            additional_overhead,
            ..self
        }
    }

    pub fn with_data_weights(self, data_weights: DataWeights) -> Self {
        Self {
            data_weights,
            ..self
        }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn gas_price(&self) -> GasPrice {
        self.gas_price
    }

    pub fn context(&self) -> &PricingContext {
        &self.context
    }

    pub fn l2_constants(&self) -> Option<&L2GasConstants> {
        self.l2_constants.as_ref()
    }

    /// Heuristic execution gas of a route. `initialized_ticks_crossed` holds
    /// one entry per pool; missing entries count as zero.
    pub fn units(&self, route: &Route, initialized_ticks_crossed: &[u32]) -> Gas {
        let units = match route.protocol() {
            Protocol::Simple => costs::SIMPLE.units(route.hops()),
            Protocol::Concentrated => ConcentratedCosts::for_chain(self.chain).units(
                route.hops(),
                ticks_within(initialized_ticks_crossed, 0, route.hops()),
            ),
            // Every section is executed as its own swap and pays its own
            // base cost.
            Protocol::Mixed => route
                .sections()
                .iter()
                .map(|section| self.section_units(section, initialized_ticks_crossed))
                .fold(0, u64::saturating_add),
        };
        Gas::from(units) + self.additional_overhead
    }

    fn section_units(&self, section: &Section, initialized_ticks_crossed: &[u32]) -> u64 {
        match section.kind() {
            PoolKind::Simple => costs::SIMPLE.units(section.hops()),
            PoolKind::Concentrated => {
                ConcentratedCosts::for_chain(self.chain).units(
                    section.hops(),
                    ticks_within(initialized_ticks_crossed, section.start, section.hops()),
                )
            }
        }
    }

    /// Estimates the execution gas of a candidate and converts it into the
    /// quote token and USD.
    pub fn estimate(&self, candidate: &Candidate) -> Result<GasCosts, Error> {
        let gas_estimate = self.units(&candidate.route, &candidate.initialized_ticks_crossed);
        let native_cost = self.native_cost(gas_estimate);
        let cost_in_usd = self.context.usd_price().quote(&native_cost)?;

        let execution = Price::from_amounts(&candidate.amount, &candidate.quote).ok();
        let (cost_in_quote, gas_accounted) =
            match self.to_quote(&native_cost, execution.as_ref())? {
                Some(cost) => (cost, true),
                None => {
                    tracing::info!(
                        route = %candidate.route,
                        %gas_estimate,
                        "gas cost not convertible into the quote token"
                    );
                    (Amount::zero(self.context.quote_token().clone()), false)
                }
            };

        Ok(GasCosts {
            gas_estimate,
            cost_in_quote,
            cost_in_usd,
            gas_accounted,
        })
    }

    /// L1 data fee of a transaction executing `routes`. The fee is estimated
    /// from the call data of the first route, encoded for the universal
    /// router. Chains without an L1 data fee get zeros.
    pub fn l1_costs(&self, routes: &[RouteWithValidQuote]) -> Result<L1GasCosts, Error> {
        let Some(constants) = &self.l2_constants else {
            return Ok(L1GasCosts::zero(&self.context));
        };
        let first = routes.first().ok_or(Error::NoRoutes)?;
        let (_, parameters) = trade::build_trade(std::slice::from_ref(first), &l1_swap_options())
            .map_err(|err| Error::CallData(Box::new(err)))?;

        let DataFee { l1_gas_used, fee } =
            l1::data_fee(&parameters.calldata, constants, &self.data_weights);
        let fee_native = Amount::from_u256(self.context.native().clone(), fee);
        let cost_l1_usd = self.context.usd_price().quote(&fee_native)?;
        let execution = Price::from_amounts(first.amount(), first.raw_quote()).ok();
        let cost_l1_quote = self
            .to_quote(&fee_native, execution.as_ref())?
            .unwrap_or_else(|| Amount::zero(self.context.quote_token().clone()));

        tracing::debug!(
            chain = ?self.chain,
            %l1_gas_used,
            %fee,
            calldata_bytes = parameters.calldata.len(),
            "L1 data fee"
        );
        Ok(L1GasCosts {
            gas_used_l1: l1_gas_used,
            fee_native,
            cost_l1_usd,
            cost_l1_quote,
        })
    }

    fn native_cost(&self, gas: Gas) -> Amount {
        Amount::from_raw(
            self.context.native().clone(),
            u256_to_big_int(&gas.0) * u256_to_big_int(&self.gas_price.0),
        )
    }

    /// Converts a cost in the native token into the quote token, directly
    /// through the native/quote reference pool and synthetically through
    /// the native/amount pool followed by the route's own execution price.
    /// The cheaper figure wins. `None` when neither conversion exists.
    fn to_quote(
        &self,
        native_cost: &Amount,
        execution: Option<&Price>,
    ) -> Result<Option<Amount>, Error> {
        let quote_token = self.context.quote_token();
        if quote_token.wrapped() == *self.context.native() {
            // The native token and its wrapper trade 1:1.
            let parity = Price::new(
                native_cost.token().clone(),
                quote_token.clone(),
                BigRational::one(),
            );
            return Ok(Some(parity.quote(native_cost)?));
        }

        let direct = self
            .context
            .native_quote_price()
            .map(|price| price.quote(native_cost))
            .transpose()?;
        let synthetic = match (self.context.native_amount_price(), execution) {
            (Some(native_amount), Some(execution)) => {
                Some(execution.quote(&native_amount.quote(native_cost)?)?)
            }
            _ => None,
        };
        Ok(match (direct, synthetic) {
            (Some(direct), Some(synthetic)) => Some(direct.min(synthetic)?),
            (direct, synthetic) => direct.or(synthetic),
        })
    }
}

/// Sum of the crossed ticks of `hops` pools starting at pool `start`.
fn ticks_within(initialized_ticks_crossed: &[u32], start: usize, hops: usize) -> u64 {
    initialized_ticks_crossed
        .iter()
        .skip(start)
        .take(hops)
        .map(|ticks| u64::from(*ticks))
        .fold(0, u64::saturating_add)
}

/// Swap options the L1 data fee is estimated with. Only the size and byte
/// composition of the call data matter, so the values are placeholders.
fn l1_swap_options() -> SwapOptions {
    SwapOptions {
        strategy: SubmissionStrategy::UniversalRouter,
        recipient: Some(H160::from_low_u64_be(1)),
        slippage_tolerance: Percent::from_bps(5),
        deadline: Some(U256::from(100)),
    }
}
