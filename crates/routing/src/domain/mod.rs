pub mod amount;
pub mod eth;
pub mod gas;
pub mod pool;
pub mod price;
pub mod pricing;
pub mod quote;
pub mod route;
pub mod session;
pub mod swap_route;
pub mod trade;

pub use {
    amount::{Amount, Percent},
    eth::{Token, TokenAddress},
    pool::{ConcentratedPool, FeeTier, Pool, SimplePool},
    price::Price,
    route::{Protocol, Route},
};
