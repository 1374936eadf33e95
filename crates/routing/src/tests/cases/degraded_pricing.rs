//! Pricing when a gas cost cannot be converted into the quote token.

use {
    crate::{
        domain::{
            amount::Amount,
            eth::{GasPrice, H160, Token},
            gas,
            pool::FeeTier,
            pricing::PricingContext,
            quote::{Candidate, TradeType, price_route},
        },
        infra::tokens,
        tests::fixtures::{self, mainnet},
    },
    chain::Chain,
    std::sync::Arc,
};

fn exotic() -> Token {
    Token::erc20(Chain::Mainnet, H160::repeat_byte(0xee), 18, "EXO")
}

fn context(amount: Token, native_amount_pool: bool) -> PricingContext {
    let weth = tokens::wrapped_native(Chain::Mainnet);
    let usd_pool = fixtures::concentrated_pool(weth, &mainnet::usdc(), FeeTier::Low, 1_000_000);
    let native_amount_pool = native_amount_pool
        .then(|| fixtures::concentrated_pool(weth, &amount, FeeTier::Medium, 1_000_000));
    PricingContext::new(
        Chain::Mainnet,
        exotic(),
        amount,
        usd_pool,
        None,
        native_amount_pool,
    )
    .unwrap()
}

#[test]
fn missing_native_pool_degrades_gas_accounting() {
    let model = gas::build_gas_model(
        Chain::Mainnet,
        GasPrice::from_gwei(50),
        Arc::new(context(mainnet::weth(), false)),
        None,
    )
    .unwrap();
    let route = fixtures::simple_route(&[mainnet::weth(), exotic()]);
    let candidate = Candidate {
        amount: Amount::from_raw(mainnet::weth(), fixtures::pow10(18)),
        quote: Amount::from_raw(exotic(), fixtures::pow10(21)),
        route: Arc::new(route),
        percent: 100,
        trade_type: TradeType::ExactInput,
        initialized_ticks_crossed: vec![],
    };

    let priced = price_route(candidate, &model).unwrap();

    assert_eq!(priced.gas_estimate(), 135_000_u64.into());
    assert!(priced.gas_cost_in_quote().is_zero());
    assert_eq!(priced.gas_cost_in_quote().token(), &exotic());
    // 135000 * 50 gwei at 2500 USDC per ETH
    assert_eq!(
        priced.gas_cost_in_usd(),
        &Amount::from_raw(mainnet::usdc(), 16_875_000)
    );
    assert!(!priced.gas_accounted());
    assert_eq!(priced.quote_adjusted_for_gas(), priced.raw_quote());
}

#[test]
fn amount_token_pool_rescues_gas_accounting() {
    let model = gas::build_gas_model(
        Chain::Mainnet,
        GasPrice::from_gwei(50),
        Arc::new(context(mainnet::usdc(), true)),
        None,
    )
    .unwrap();
    let route = fixtures::concentrated_route(&[mainnet::usdc(), exotic()]);
    let candidate = Candidate {
        amount: Amount::from_raw(mainnet::usdc(), 1_000_000),
        quote: Amount::from_raw(exotic(), fixtures::pow10(18) * 2),
        route: Arc::new(route),
        percent: 100,
        trade_type: TradeType::ExactInput,
        initialized_ticks_crossed: vec![2],
    };

    let priced = price_route(candidate, &model).unwrap();

    // 18 USDC of gas at 2 EXO per USDC.
    assert_eq!(
        priced.gas_cost_in_quote(),
        &Amount::from_raw(exotic(), fixtures::pow10(18) * 36)
    );
    assert!(priced.gas_accounted());
}
