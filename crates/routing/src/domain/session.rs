//! A quoting session.
//!
//! Setup fetches everything the session needs from the outside world (the
//! reference pools and the L2 gas constants) concurrently and freezes it in
//! a [`GasModel`]. Pricing candidates afterwards is pure computation over
//! that snapshot.

use {
    crate::{
        domain::{
            eth::{GasPrice, Token},
            gas::{self, GasModel, l1::L2GasConstants},
            pricing::{self, PricingContext},
            quote::{self, Candidate, RouteWithValidQuote, TradeType},
            swap_route::{self, SwapRoute},
            trade::{self, MethodParameters, SwapOptions, Trade},
        },
        infra::{
            config::Settings,
            providers::{L2GasConstantsProviding, PoolProviding},
        },
    },
    chain::Chain,
    futures::future::{AbortRegistration, Abortable},
    itertools::Itertools,
    rayon::prelude::*,
    std::{sync::Arc, time::Instant},
};

/// Batches at least this large are priced on the rayon thread pool.
const PARALLEL_THRESHOLD: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Pricing(#[from] pricing::Error),
    #[error("failed to fetch L2 gas constants: {0:#}")]
    L2GasConstants(anyhow::Error),
    #[error(transparent)]
    Gas(#[from] gas::Error),
    #[error("request is for {request:?} but the settings are for {settings:?}")]
    ChainMismatch { settings: Chain, request: Chain },
    #[error("quoting session was cancelled")]
    Cancelled,
}

/// What is being quoted.
#[derive(Clone, Debug)]
pub struct Request {
    pub chain: Chain,
    /// Token the quotes are in: the output of exact input trades, the input
    /// of exact output trades.
    pub quote_token: Token,
    /// Token the traded amount is in.
    pub amount_token: Token,
    pub gas_price: GasPrice,
}

/// External collaborators consulted while setting up a session.
pub struct Providers<'a> {
    pub pools: &'a dyn PoolProviding,
    /// Source of fresh L2 gas constants. Without one, the constants from the
    /// configuration are used.
    pub l2_gas_constants: Option<&'a dyn L2GasConstantsProviding>,
}

#[derive(Debug)]
pub struct Session {
    request: Request,
    gas_model: GasModel,
}

impl Session {
    /// Sets the session up. Dropping the returned future, or aborting
    /// through the handle paired with `abort`, cancels the lookups still in
    /// flight.
    pub async fn prepare(
        request: Request,
        settings: &Settings,
        providers: Providers<'_>,
        abort: AbortRegistration,
    ) -> Result<Self, Error> {
        Abortable::new(Self::setup(request, settings, providers), abort)
            .await
            .map_err(|_| {
                tracing::debug!("quoting session cancelled during setup");
                Error::Cancelled
            })?
    }

    async fn setup(
        request: Request,
        settings: &Settings,
        providers: Providers<'_>,
    ) -> Result<Self, Error> {
        if request.chain != settings.chain {
            return Err(Error::ChainMismatch {
                settings: settings.chain,
                request: request.chain,
            });
        }
        let start = Instant::now();
        let (context, l2_constants) = futures::try_join!(
            async {
                PricingContext::resolve(
                    request.chain,
                    request.quote_token.clone(),
                    request.amount_token.clone(),
                    providers.pools,
                )
                .await
                .map_err(Error::from)
            },
            l2_gas_constants(request.chain, settings, providers.l2_gas_constants),
        )?;

        let gas_model = gas::build_gas_model(
            request.chain,
            request.gas_price,
            Arc::new(context),
            l2_constants,
        )?
        .with_additional_overhead(settings.additional_gas_overhead)
        .with_data_weights(settings.data_weights);

        tracing::debug!(
            chain = ?request.chain,
            quote_token = %request.quote_token,
            amount_token = %request.amount_token,
            gas_price = %request.gas_price,
            elapsed = ?start.elapsed(),
            "quoting session prepared"
        );
        Ok(Self { request, gas_model })
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn gas_model(&self) -> &GasModel {
        &self.gas_model
    }

    pub fn price(&self, candidate: Candidate) -> Result<RouteWithValidQuote, quote::Error> {
        quote::price_route(candidate, &self.gas_model)
    }

    /// Prices a batch of candidates. A candidate repeating the route, split
    /// and trade type of an earlier one is dropped so every split is priced
    /// exactly once.
    pub fn price_all(
        &self,
        candidates: Vec<Candidate>,
    ) -> Vec<Result<RouteWithValidQuote, quote::Error>> {
        let total = candidates.len();
        let candidates: Vec<_> = candidates
            .into_iter()
            .unique_by(|candidate| {
                (
                    candidate.route.pool_addresses(),
                    candidate.percent,
                    candidate.trade_type,
                )
            })
            .collect();
        if candidates.len() < total {
            tracing::warn!(
                duplicates = total - candidates.len(),
                "dropped duplicate candidates"
            );
        }

        let start = Instant::now();
        let priced: Vec<_> = if candidates.len() >= PARALLEL_THRESHOLD {
            candidates
                .into_par_iter()
                .map(|candidate| self.price(candidate))
                .collect()
        } else {
            candidates
                .into_iter()
                .map(|candidate| self.price(candidate))
                .collect()
        };
        tracing::debug!(
            candidates = priced.len(),
            failed = priced.iter().filter(|result| result.is_err()).count(),
            elapsed = ?start.elapsed(),
            "priced candidates"
        );
        priced
    }

    /// Totals the chosen routes, folding in the L1 data fee.
    pub fn swap_route(
        &self,
        routes: Vec<RouteWithValidQuote>,
        trade_type: TradeType,
    ) -> Result<SwapRoute, swap_route::Error> {
        SwapRoute::from_routes(routes, trade_type, &self.gas_model)
    }

    pub fn build_trade(
        &self,
        routes: &[RouteWithValidQuote],
        options: &SwapOptions,
    ) -> Result<(Trade, MethodParameters), trade::Error> {
        trade::build_trade(routes, options)
    }
}

async fn l2_gas_constants(
    chain: Chain,
    settings: &Settings,
    provider: Option<&dyn L2GasConstantsProviding>,
) -> Result<Option<L2GasConstants>, Error> {
    if chain.l1_data_fee().is_none() {
        return Ok(None);
    }
    match provider {
        Some(provider) => provider
            .fetch(chain)
            .await
            .map(Some)
            .map_err(Error::L2GasConstants),
        None => Ok(settings.l2_gas_constants.clone()),
    }
}
