//! Assembles priced routes into one trade and encodes it for a router.

pub mod swap_router;
pub mod universal_router;

use {
    crate::{
        domain::{
            amount::{self, Amount, Percent},
            eth::{H160, Token, U256},
            pool::ConcentratedPool,
            quote::{RouteWithValidQuote, TradeType},
            route::{Protocol, Route},
        },
        infra::contracts,
    },
    chain::Chain,
    ethabi::{ParamType, Token as AbiToken},
    num::{BigRational, One},
    number::conversions::big_int_to_u256,
    serde_with::DeserializeFromStr,
    std::{fmt, str::FromStr, sync::Arc},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported submission strategy {0:?}")]
    UnsupportedSubmissionStrategy(String),
    #[error("a trade needs at least one route")]
    NoRoutes,
    #[error("routes start at different tokens: {expected} and {actual}")]
    InputMismatch {
        expected: Box<Token>,
        actual: Box<Token>,
    },
    #[error("routes end at different tokens: {expected} and {actual}")]
    OutputMismatch {
        expected: Box<Token>,
        actual: Box<Token>,
    },
    #[error("cannot mix {expected} and {actual} routes in one trade")]
    TradeTypeMismatch {
        expected: TradeType,
        actual: TradeType,
    },
    #[error("mixed routes only support exact input trades")]
    MixedExactOutput,
    #[error("no {strategy} deployment on {chain:?}")]
    NoRouter {
        strategy: SubmissionStrategy,
        chain: Chain,
    },
    #[error("token {0} is not on a supported chain")]
    UnsupportedChain(Box<Token>),
    #[error("amount {0} does not fit into 256 bits")]
    AmountOutOfRange(String),
    #[error(transparent)]
    Amount(#[from] amount::Error),
}

/// How the trade is submitted on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, DeserializeFromStr)]
pub enum SubmissionStrategy {
    /// Direct calls into `SwapRouter02`, batched with `multicall`.
    SwapRouter02,
    /// A command list for the universal router's `execute`.
    UniversalRouter,
}

impl FromStr for SubmissionStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swap-router-02" => Ok(Self::SwapRouter02),
            "universal-router" => Ok(Self::UniversalRouter),
            other => Err(Error::UnsupportedSubmissionStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for SubmissionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SwapRouter02 => "swap-router-02",
            Self::UniversalRouter => "universal-router",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapOptions {
    pub strategy: SubmissionStrategy,
    /// Receiver of the output, the caller when `None`.
    pub recipient: Option<H160>,
    pub slippage_tolerance: Percent,
    /// Unix timestamp after which the transaction reverts.
    pub deadline: Option<U256>,
}

/// One route of a trade with its amounts before slippage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Swap {
    pub route: Arc<Route>,
    pub input_amount: Amount,
    pub output_amount: Amount,
}

impl Swap {
    /// The least output accepted: exact for exact output trades, otherwise
    /// `output / (1 + slippage)` rounded down.
    pub fn minimum_amount_out(&self, trade_type: TradeType, slippage: &Percent) -> Amount {
        minimum_amount_out(&self.output_amount, trade_type, slippage)
    }

    /// The most input spent: exact for exact input trades, otherwise
    /// `input * (1 + slippage)` rounded down.
    pub fn maximum_amount_in(&self, trade_type: TradeType, slippage: &Percent) -> Amount {
        maximum_amount_in(&self.input_amount, trade_type, slippage)
    }
}

/// Routes of possibly different protocols executed together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trade {
    trade_type: TradeType,
    /// Grouped by protocol: simple, then concentrated, then mixed routes.
    swaps: Vec<Swap>,
    input_amount: Amount,
    output_amount: Amount,
}

impl Trade {
    pub fn new(trade_type: TradeType, mut swaps: Vec<Swap>) -> Result<Self, Error> {
        let first = swaps.first().ok_or(Error::NoRoutes)?;
        let (input, output) = (first.route.input().clone(), first.route.output().clone());
        for swap in &swaps {
            if *swap.route.input() != input {
                return Err(Error::InputMismatch {
                    expected: Box::new(input),
                    actual: Box::new(swap.route.input().clone()),
                });
            }
            if *swap.route.output() != output {
                return Err(Error::OutputMismatch {
                    expected: Box::new(output),
                    actual: Box::new(swap.route.output().clone()),
                });
            }
            if swap.route.protocol() == Protocol::Mixed && trade_type == TradeType::ExactOutput {
                return Err(Error::MixedExactOutput);
            }
        }
        swaps.sort_by_key(|swap| swap.route.protocol());

        let mut input_amount = Amount::zero(input);
        let mut output_amount = Amount::zero(output);
        for swap in &swaps {
            input_amount = input_amount.add(&swap.input_amount)?;
            output_amount = output_amount.add(&swap.output_amount)?;
        }
        Ok(Self {
            trade_type,
            swaps,
            input_amount,
            output_amount,
        })
    }

    /// Rebuilds the trade that executes a set of priced routes. Routes trade
    /// their raw quotes, gas only matters for ranking.
    pub fn from_routes(routes: &[RouteWithValidQuote]) -> Result<Self, Error> {
        let first = routes.first().ok_or(Error::NoRoutes)?;
        let trade_type = first.trade_type();
        let swaps = routes
            .iter()
            .map(|route| {
                if route.trade_type() != trade_type {
                    return Err(Error::TradeTypeMismatch {
                        expected: trade_type,
                        actual: route.trade_type(),
                    });
                }
                Ok(Swap {
                    route: route.route().clone(),
                    input_amount: route.input_amount().clone(),
                    output_amount: route.output_amount().clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(trade_type, swaps)
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn swaps(&self) -> &[Swap] {
        &self.swaps
    }

    pub fn input_amount(&self) -> &Amount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &Amount {
        &self.output_amount
    }

    pub fn input_token(&self) -> &Token {
        self.input_amount.token()
    }

    pub fn output_token(&self) -> &Token {
        self.output_amount.token()
    }

    pub fn chain(&self) -> Result<Chain, Error> {
        self.input_token()
            .chain()
            .ok_or_else(|| Error::UnsupportedChain(Box::new(self.input_token().clone())))
    }

    pub fn minimum_amount_out(&self, slippage: &Percent) -> Amount {
        minimum_amount_out(&self.output_amount, self.trade_type, slippage)
    }

    pub fn maximum_amount_in(&self, slippage: &Percent) -> Amount {
        maximum_amount_in(&self.input_amount, self.trade_type, slippage)
    }
}

/// Transaction parameters of an encoded trade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodParameters {
    pub to: H160,
    pub calldata: Vec<u8>,
    /// Native token sent along, for trades paying in the native token.
    pub value: U256,
}

/// Builds the trade for a set of priced routes and encodes its call data
/// with the configured submission strategy.
pub fn build_trade(
    routes: &[RouteWithValidQuote],
    options: &SwapOptions,
) -> Result<(Trade, MethodParameters), Error> {
    let trade = Trade::from_routes(routes)?;
    let chain = trade.chain()?;
    let router = match options.strategy {
        SubmissionStrategy::SwapRouter02 => contracts::swap_router_02(chain),
        SubmissionStrategy::UniversalRouter => contracts::universal_router(chain),
    }
    .ok_or(Error::NoRouter {
        strategy: options.strategy,
        chain,
    })?;

    let parameters = match options.strategy {
        SubmissionStrategy::SwapRouter02 => swap_router::encode(&trade, options, router)?,
        SubmissionStrategy::UniversalRouter => universal_router::encode(&trade, options, router)?,
    };
    tracing::debug!(
        strategy = %options.strategy,
        swaps = trade.swaps().len(),
        input = %trade.input_amount(),
        output = %trade.output_amount(),
        calldata_bytes = parameters.calldata.len(),
        "built trade"
    );
    Ok((trade, parameters))
}

fn minimum_amount_out(output: &Amount, trade_type: TradeType, slippage: &Percent) -> Amount {
    match trade_type {
        TradeType::ExactOutput => output.clone(),
        TradeType::ExactInput => {
            let factor = (BigRational::one() + slippage.ratio()).recip();
            let whole = Amount::from_raw(output.token().clone(), output.quotient());
            Amount::from_raw(output.token().clone(), whole.multiply(&factor).quotient())
        }
    }
}

fn maximum_amount_in(input: &Amount, trade_type: TradeType, slippage: &Percent) -> Amount {
    match trade_type {
        TradeType::ExactInput => input.clone(),
        TradeType::ExactOutput => {
            let factor = BigRational::one() + slippage.ratio();
            let whole = Amount::from_raw(input.token().clone(), input.quotient());
            Amount::from_raw(input.token().clone(), whole.multiply(&factor).quotient())
        }
    }
}

/// Recipient placeholder the routers resolve to the transaction sender.
pub(crate) const MSG_SENDER: H160 = H160([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
]);

/// Recipient placeholder the routers resolve to themselves.
pub(crate) const ADDRESS_THIS: H160 = H160([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2,
]);

/// Function selector followed by the ABI encoded arguments.
pub(crate) fn encode_call(name: &str, params: &[ParamType], args: &[AbiToken]) -> Vec<u8> {
    let mut calldata = ethabi::short_signature(name, params).to_vec();
    calldata.extend(ethabi::encode(args));
    calldata
}

/// Whole raw units of an amount, as passed to the routers.
pub(crate) fn wei(amount: &Amount) -> Result<U256, Error> {
    big_int_to_u256(&amount.quotient()).ok_or_else(|| Error::AmountOutOfRange(amount.to_string()))
}

/// Packed concentrated liquidity path: `token ‖ fee ‖ token ...`, where the
/// fee takes 3 bytes. Exact output paths run from the output backwards.
pub(crate) fn encode_path(tokens: &[Token], pools: &[&ConcentratedPool], exact_output: bool) -> Vec<u8> {
    let mut hops: Vec<(H160, u32)> = tokens
        .iter()
        .zip(pools)
        .map(|(token, pool)| (token.wrapped_address(), pool.fee.pips()))
        .collect();
    let mut last = tokens
        .last()
        .map(Token::wrapped_address)
        .unwrap_or_default();
    if exact_output {
        let first = tokens
            .first()
            .map(Token::wrapped_address)
            .unwrap_or_default();
        let mut reversed: Vec<(H160, u32)> = Vec::with_capacity(hops.len());
        let mut next = last;
        for (token, fee) in hops.iter().rev() {
            reversed.push((next, *fee));
            next = *token;
        }
        hops = reversed;
        last = first;
    }

    let mut path = Vec::with_capacity(hops.len() * 23 + 20);
    for (token, fee) in hops {
        path.extend_from_slice(token.as_bytes());
        path.extend_from_slice(&fee.to_be_bytes()[1..]);
    }
    path.extend_from_slice(last.as_bytes());
    path
}
