//! Gas estimates and gas-adjusted quotes of single routes on mainnet.

use {
    crate::{
        domain::{
            amount::Amount,
            eth::{Gas, GasPrice, Token},
            gas::{self, GasModel},
            quote::{Candidate, TradeType, price_route},
            route::Route,
        },
        tests::fixtures::{self, mainnet},
    },
    chain::Chain,
    std::sync::Arc,
};

fn model(quote: Token, amount: Token) -> GasModel {
    let context = fixtures::context(Chain::Mainnet, quote, amount);
    gas::build_gas_model(
        Chain::Mainnet,
        GasPrice::from_gwei(50),
        Arc::new(context),
        None,
    )
    .unwrap()
}

fn exact_input(route: Route, amount: u64, quote: u64, ticks: Vec<u32>) -> Candidate {
    Candidate {
        amount: Amount::from_raw(route.input().clone(), amount),
        quote: Amount::from_raw(route.output().clone(), quote),
        route: Arc::new(route),
        percent: 100,
        trade_type: TradeType::ExactInput,
        initialized_ticks_crossed: ticks,
    }
}

#[test]
fn single_hop_concentrated_swap() {
    let model = model(mainnet::usdc(), mainnet::weth());
    let candidate = exact_input(
        fixtures::concentrated_route(&[mainnet::weth(), mainnet::usdc()]),
        1_000_000_000_000_000_000,
        2_500_000_000,
        vec![2],
    );

    let priced = price_route(candidate, &model).unwrap();

    // 2000 + 80000 * 1 + 31000 * 2
    assert_eq!(priced.gas_estimate(), Gas::from(144_000_u64));
    // 144000 * 50 gwei = 0.0072 ETH at 2500 USDC per ETH
    assert_eq!(
        priced.gas_cost_in_quote(),
        &Amount::from_raw(mainnet::usdc(), 18_000_000)
    );
    assert_eq!(
        priced.gas_cost_in_usd(),
        &Amount::from_raw(mainnet::usdc(), 18_000_000)
    );
    assert_eq!(
        priced.quote_adjusted_for_gas(),
        &Amount::from_raw(mainnet::usdc(), 2_482_000_000_u64)
    );
    assert!(priced.gas_accounted());
}

#[test]
fn mixed_route_sections_pay_their_own_base_cost() {
    let model = model(mainnet::dai(), mainnet::weth());
    let path = [mainnet::weth(), mainnet::usdc(), mainnet::dai()];
    let mixed = fixtures::mixed_route(&path);

    // Simple section: 135000. Concentrated section: 2000 + 80000 + 31000 * 3.
    assert_eq!(model.units(&mixed, &[0, 3]), Gas::from(310_000_u64));
    // A section crossing no initialized tick still pays for one.
    assert_eq!(model.units(&mixed, &[0, 0]), Gas::from(248_000_u64));

    let simple = fixtures::simple_route(&path[..2]);
    let concentrated = fixtures::concentrated_route(&path[1..]);
    for ticks in [0, 1, 7] {
        assert_eq!(
            model.units(&mixed, &[0, ticks]),
            model.units(&simple, &[0]) + model.units(&concentrated, &[ticks])
        );
    }
}

#[test]
fn longer_concentrated_routes_cost_more() {
    let model = model(mainnet::dai(), mainnet::weth());
    let short = fixtures::concentrated_route(&[mainnet::weth(), mainnet::usdc()]);
    let long = fixtures::concentrated_route(&[mainnet::weth(), mainnet::usdc(), mainnet::dai()]);
    for ticks in 0..5 {
        for extra in 0..3 {
            assert!(model.units(&long, &[ticks, extra]) >= model.units(&short, &[ticks]));
        }
    }
}

#[test]
fn gas_moves_quotes_against_the_trader() {
    let model = model(mainnet::usdc(), mainnet::weth());
    let one_ether = 1_000_000_000_000_000_000_u64;

    for route in [
        fixtures::simple_route(&[mainnet::weth(), mainnet::usdc()]),
        fixtures::concentrated_route(&[mainnet::weth(), mainnet::usdc()]),
        fixtures::concentrated_route(&[mainnet::weth(), mainnet::dai(), mainnet::usdc()]),
    ] {
        let priced = price_route(exact_input(route, one_ether, 2_500_000_000, vec![]), &model)
            .unwrap();
        assert!(priced.quote_adjusted_for_gas() < priced.raw_quote());
    }

    let route = fixtures::concentrated_route(&[mainnet::usdc(), mainnet::weth()]);
    let priced = price_route(
        Candidate {
            amount: Amount::from_raw(mainnet::weth(), one_ether),
            quote: Amount::from_raw(mainnet::usdc(), 2_500_000_000_u64),
            route: Arc::new(route),
            percent: 100,
            trade_type: TradeType::ExactOutput,
            initialized_ticks_crossed: vec![],
        },
        &model,
    )
    .unwrap();
    assert!(priced.quote_adjusted_for_gas() > priced.raw_quote());

    // Free gas leaves the quote untouched.
    let context = fixtures::context(Chain::Mainnet, mainnet::usdc(), mainnet::weth());
    let free = gas::build_gas_model(Chain::Mainnet, GasPrice::default(), Arc::new(context), None)
        .unwrap();
    let priced = price_route(
        exact_input(
            fixtures::simple_route(&[mainnet::weth(), mainnet::usdc()]),
            one_ether,
            2_500_000_000,
            vec![],
        ),
        &free,
    )
    .unwrap();
    assert_eq!(priced.quote_adjusted_for_gas(), priced.raw_quote());
}

#[test]
fn cheaper_synthetic_conversion_wins() {
    // Both DAI and USDC have native reference pools, but the quoter values
    // 1 USDC at only 0.5 DAI. Converting the gas cost through USDC and the
    // route's own price is cheaper than the direct DAI pool.
    let model = model(mainnet::dai(), mainnet::usdc());
    let candidate = exact_input(
        fixtures::concentrated_route(&[mainnet::usdc(), mainnet::dai()]),
        1_000_000,
        500_000_000_000_000_000,
        vec![2],
    );

    let priced = price_route(candidate, &model).unwrap();

    // 18 USDC of gas at 0.5 DAI per USDC.
    assert_eq!(
        priced.gas_cost_in_quote(),
        &Amount::from_raw(mainnet::dai(), 9_000_000_000_000_000_000_u64)
    );
    assert!(priced.gas_accounted());
}
