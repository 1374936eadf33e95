//! Candidate routes and their gas-adjusted valuations.

use {
    crate::domain::{
        amount::{self, Amount},
        eth::{Gas, H160, Token},
        gas::{self, GasModel},
        route::Route,
    },
    std::{fmt, sync::Arc},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExactInput => "exact input",
            Self::ExactOutput => "exact output",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{trade_type} amount must be in {expected}, got {actual}")]
    AmountTokenMismatch {
        trade_type: TradeType,
        expected: Box<Token>,
        actual: Box<Token>,
    },
    #[error("{trade_type} quote must be in {expected}, got {actual}")]
    QuoteTokenMismatch {
        trade_type: TradeType,
        expected: Box<Token>,
        actual: Box<Token>,
    },
    #[error("route has {hops} pools but {ticks} initialized tick counts")]
    TicksMismatch { hops: usize, ticks: usize },
    #[error(transparent)]
    Gas(#[from] gas::Error),
    #[error(transparent)]
    Amount(#[from] amount::Error),
}

/// A route quoted by the external quoter for one split of the trade.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub route: Arc<Route>,
    /// The split amount: what goes in for exact input trades, what comes
    /// out for exact output trades.
    pub amount: Amount,
    /// Share of the trade's total amount, in percent.
    pub percent: u32,
    /// The quoter's answer before gas: the output of exact input trades,
    /// the input of exact output trades.
    pub quote: Amount,
    pub trade_type: TradeType,
    /// Initialized ticks crossed in each pool, zero for constant product
    /// pools. Empty when unknown.
    pub initialized_ticks_crossed: Vec<u32>,
}

impl Candidate {
    /// The tokens `amount` and `quote` have to be in.
    fn expected_tokens(&self) -> (&Token, &Token) {
        match self.trade_type {
            TradeType::ExactInput => (self.route.input(), self.route.output()),
            TradeType::ExactOutput => (self.route.output(), self.route.input()),
        }
    }

    fn validate(&self, gas_model: &GasModel) -> Result<(), Error> {
        let context = gas_model.context();
        let (amount_token, quote_token) = self.expected_tokens();
        for expected in [amount_token, context.amount_token()] {
            if self.amount.token() != expected {
                return Err(Error::AmountTokenMismatch {
                    trade_type: self.trade_type,
                    expected: Box::new(expected.clone()),
                    actual: Box::new(self.amount.token().clone()),
                });
            }
        }
        for expected in [quote_token, context.quote_token()] {
            if self.quote.token() != expected {
                return Err(Error::QuoteTokenMismatch {
                    trade_type: self.trade_type,
                    expected: Box::new(expected.clone()),
                    actual: Box::new(self.quote.token().clone()),
                });
            }
        }
        let ticks = self.initialized_ticks_crossed.len();
        if ticks != 0 && ticks != self.route.hops() {
            return Err(Error::TicksMismatch {
                hops: self.route.hops(),
                ticks,
            });
        }
        Ok(())
    }
}

/// A candidate route priced net of gas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteWithValidQuote {
    route: Arc<Route>,
    amount: Amount,
    percent: u32,
    trade_type: TradeType,
    raw_quote: Amount,
    quote_adjusted_for_gas: Amount,
    gas_estimate: Gas,
    gas_cost_in_quote: Amount,
    gas_cost_in_usd: Amount,
    gas_accounted: bool,
    initialized_ticks_crossed: Vec<u32>,
    pool_addresses: Vec<H160>,
    token_path: Vec<Token>,
}

impl RouteWithValidQuote {
    pub fn new(candidate: Candidate, gas_model: &GasModel) -> Result<Self, Error> {
        candidate.validate(gas_model)?;
        let costs = gas_model.estimate(&candidate)?;
        let quote_adjusted_for_gas = match candidate.trade_type {
            TradeType::ExactInput => candidate.quote.subtract(&costs.cost_in_quote)?,
            TradeType::ExactOutput => candidate.quote.add(&costs.cost_in_quote)?,
        };

        let Candidate {
            route,
            amount,
            percent,
            quote,
            trade_type,
            initialized_ticks_crossed,
        } = candidate;
        Ok(Self {
            pool_addresses: route.pool_addresses(),
            token_path: route.path().to_vec(),
            route,
            amount,
            percent,
            trade_type,
            raw_quote: quote,
            quote_adjusted_for_gas,
            gas_estimate: costs.gas_estimate,
            gas_cost_in_quote: costs.cost_in_quote,
            gas_cost_in_usd: costs.cost_in_usd,
            gas_accounted: costs.gas_accounted,
            initialized_ticks_crossed,
        })
    }

    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    /// The quote before gas.
    pub fn raw_quote(&self) -> &Amount {
        &self.raw_quote
    }

    /// The quote less gas for exact input trades, plus gas for exact output
    /// trades.
    pub fn quote_adjusted_for_gas(&self) -> &Amount {
        &self.quote_adjusted_for_gas
    }

    pub fn gas_estimate(&self) -> Gas {
        self.gas_estimate
    }

    pub fn gas_cost_in_quote(&self) -> &Amount {
        &self.gas_cost_in_quote
    }

    pub fn gas_cost_in_usd(&self) -> &Amount {
        &self.gas_cost_in_usd
    }

    /// Whether the gas cost made it into the quote token. Routes where it
    /// did not are still priced, with a zero gas cost in the quote token.
    pub fn gas_accounted(&self) -> bool {
        self.gas_accounted
    }

    pub fn initialized_ticks_crossed(&self) -> &[u32] {
        &self.initialized_ticks_crossed
    }

    pub fn pool_addresses(&self) -> &[H160] {
        &self.pool_addresses
    }

    pub fn token_path(&self) -> &[Token] {
        &self.token_path
    }

    /// What goes into the route.
    pub fn input_amount(&self) -> &Amount {
        match self.trade_type {
            TradeType::ExactInput => &self.amount,
            TradeType::ExactOutput => &self.raw_quote,
        }
    }

    /// What comes out of the route.
    pub fn output_amount(&self) -> &Amount {
        match self.trade_type {
            TradeType::ExactInput => &self.raw_quote,
            TradeType::ExactOutput => &self.amount,
        }
    }
}

/// Prices a candidate route net of gas.
pub fn price_route(candidate: Candidate, gas_model: &GasModel) -> Result<RouteWithValidQuote, Error> {
    RouteWithValidQuote::new(candidate, gas_model)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            domain::eth::GasPrice,
            tests::fixtures::{self, mainnet},
        },
        chain::Chain,
    };

    fn model() -> GasModel {
        let context = fixtures::context(Chain::Mainnet, mainnet::usdc(), mainnet::weth());
        gas::build_gas_model(Chain::Mainnet, GasPrice::from_gwei(50), Arc::new(context), None)
            .unwrap()
    }

    fn candidate(trade_type: TradeType) -> Candidate {
        let route = Arc::new(fixtures::concentrated_route(&[mainnet::weth(), mainnet::usdc()]));
        let weth = Amount::from_raw(mainnet::weth(), fixtures::pow10(18));
        let usdc = Amount::from_raw(mainnet::usdc(), 2_500_000_000_u64);
        match trade_type {
            TradeType::ExactInput => Candidate {
                route,
                amount: weth,
                percent: 100,
                quote: usdc,
                trade_type,
                initialized_ticks_crossed: vec![2],
            },
            TradeType::ExactOutput => Candidate {
                route: Arc::new(fixtures::concentrated_route(&[
                    mainnet::usdc(),
                    mainnet::weth(),
                ])),
                amount: weth,
                percent: 100,
                quote: usdc,
                trade_type,
                initialized_ticks_crossed: vec![2],
            },
        }
    }

    #[test]
    fn exact_input_subtracts_gas() {
        let priced = price_route(candidate(TradeType::ExactInput), &model()).unwrap();
        assert!(priced.gas_accounted());
        assert!(!priced.gas_cost_in_quote().is_zero());
        assert!(priced.quote_adjusted_for_gas() < priced.raw_quote());
        assert_eq!(
            priced
                .quote_adjusted_for_gas()
                .add(priced.gas_cost_in_quote())
                .unwrap(),
            *priced.raw_quote()
        );
        assert_eq!(priced.input_amount(), priced.amount());
        assert_eq!(priced.token_path(), &[mainnet::weth(), mainnet::usdc()]);
    }

    #[test]
    fn exact_output_adds_gas() {
        let priced = price_route(candidate(TradeType::ExactOutput), &model()).unwrap();
        assert!(priced.quote_adjusted_for_gas() > priced.raw_quote());
        assert_eq!(priced.output_amount(), priced.amount());
    }

    #[test]
    fn rejects_inconsistent_candidates() {
        let mut flipped = candidate(TradeType::ExactInput);
        std::mem::swap(&mut flipped.amount, &mut flipped.quote);
        assert!(matches!(
            price_route(flipped, &model()),
            Err(Error::AmountTokenMismatch { .. })
        ));

        let mut ticks = candidate(TradeType::ExactInput);
        ticks.initialized_ticks_crossed = vec![1, 2];
        assert!(matches!(
            price_route(ticks, &model()),
            Err(Error::TicksMismatch { hops: 1, ticks: 2 })
        ));
    }

    #[test]
    fn pricing_is_deterministic() {
        let model = model();
        let first = price_route(candidate(TradeType::ExactInput), &model).unwrap();
        let second = price_route(candidate(TradeType::ExactInput), &model).unwrap();
        assert_eq!(first, second);
    }
}
