//! Gas-adjusted route valuation.
//!
//! Takes candidate routes discovered elsewhere, prices them net of the gas
//! they are expected to burn (including the L1 data fee rollups charge) and
//! assembles the chosen routes into a trade and its router call data.

pub mod domain;
pub mod infra;

#[cfg(test)]
mod tests;

pub use domain::{
    gas::{GasModel, build_gas_model},
    quote::{Candidate, RouteWithValidQuote, TradeType, price_route},
    session::Session,
    trade::build_trade,
};
