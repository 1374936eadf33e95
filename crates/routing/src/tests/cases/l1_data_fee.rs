//! L1 data fees folded into swap routes on rollups.

use {
    crate::{
        domain::{
            amount::Amount,
            eth::{Gas, GasPrice, Token, U256},
            gas::{self, GasModel, l1::L2GasConstants},
            quote::{Candidate, RouteWithValidQuote, TradeType, price_route},
            swap_route::SwapRoute,
        },
        tests::fixtures::{self, arbitrum, optimism},
    },
    chain::Chain,
    std::sync::Arc,
};

fn model(chain: Chain, weth: Token, usdc: Token, constants: L2GasConstants) -> GasModel {
    let context = fixtures::context(chain, usdc, weth);
    gas::build_gas_model(
        chain,
        GasPrice::from_gwei(1),
        Arc::new(context),
        Some(constants),
    )
    .unwrap()
}

fn sell(model: &GasModel, weth: &Token, usdc: &Token, ether_tenths: u64) -> RouteWithValidQuote {
    let candidate = Candidate {
        route: Arc::new(fixtures::concentrated_route(&[weth.clone(), usdc.clone()])),
        amount: Amount::from_raw(weth.clone(), fixtures::pow10(17) * ether_tenths),
        percent: u32::try_from(ether_tenths * 10).unwrap(),
        quote: Amount::from_raw(usdc.clone(), 250_000_000 * ether_tenths),
        trade_type: TradeType::ExactInput,
        initialized_ticks_crossed: vec![1],
    };
    price_route(candidate, model).unwrap()
}

#[test]
fn op_stack_fee_is_charged_once_per_swap_route() {
    let (weth, usdc) = (optimism::weth(), optimism::usdc());
    let model = model(Chain::Optimism, weth.clone(), usdc.clone(), fixtures::op_constants());
    let small = sell(&model, &weth, &usdc, 3);
    let large = sell(&model, &weth, &usdc, 7);
    let routes = vec![small.clone(), large.clone()];

    let l1 = model.l1_costs(&routes).unwrap();
    assert_eq!(model.l1_costs(&routes).unwrap(), l1);
    assert!(l1.gas_used_l1 > Gas::default());
    // l1 gas * 30 gwei * 0.684
    assert_eq!(
        l1.fee_native,
        Amount::from_u256(
            weth.clone(),
            l1.gas_used_l1.0 * U256::from(30_000_000_000_u64) * U256::from(684_000)
                / U256::from(1_000_000)
        )
    );
    assert!(!l1.cost_l1_quote.is_zero());
    assert!(!l1.cost_l1_usd.is_zero());

    let swap_route = SwapRoute::from_routes(routes, TradeType::ExactInput, &model).unwrap();

    assert_eq!(swap_route.routes, vec![large.clone(), small.clone()]);
    assert_eq!(swap_route.l1, l1);
    assert_eq!(
        swap_route.estimated_gas_used,
        small.gas_estimate() + large.gas_estimate() + l1.gas_used_l1
    );
    assert_eq!(
        swap_route.quote,
        small.raw_quote().add(large.raw_quote()).unwrap()
    );
    assert_eq!(
        swap_route.quote_gas_adjusted,
        small
            .quote_adjusted_for_gas()
            .add(large.quote_adjusted_for_gas())
            .unwrap()
            .subtract(&l1.cost_l1_quote)
            .unwrap()
    );
    assert_eq!(
        swap_route.estimated_gas_used_usd,
        small
            .gas_cost_in_usd()
            .add(large.gas_cost_in_usd())
            .unwrap()
            .add(&l1.cost_l1_usd)
            .unwrap()
    );
    assert!(swap_route.gas_accounted);
}

#[test]
fn arbitrum_fee_has_a_fixed_part() {
    let (weth, usdc) = (arbitrum::weth(), arbitrum::usdc());
    let model = model(
        Chain::ArbitrumOne,
        weth.clone(),
        usdc.clone(),
        fixtures::arbitrum_constants(),
    );
    let route = sell(&model, &weth, &usdc, 10);
    // Arbitrum's concentrated base cost is 5000.
    assert_eq!(route.gas_estimate(), Gas::from(116_000_u64));

    let l1 = model.l1_costs(std::slice::from_ref(&route)).unwrap();
    assert_eq!(
        l1.fee_native,
        Amount::from_u256(weth, l1.gas_used_l1.0 * U256::from(10) + U256::from(1000))
    );
}

#[test]
fn exact_output_routes_pay_the_fee_on_top() {
    let (weth, usdc) = (optimism::weth(), optimism::usdc());
    let model = model(Chain::Optimism, weth.clone(), usdc.clone(), fixtures::op_constants());
    let candidate = Candidate {
        route: Arc::new(fixtures::concentrated_route(&[usdc.clone(), weth.clone()])),
        amount: Amount::from_raw(weth, fixtures::pow10(18)),
        percent: 100,
        quote: Amount::from_raw(usdc, 2_500_000_000_u64),
        trade_type: TradeType::ExactOutput,
        initialized_ticks_crossed: vec![],
    };
    let route = price_route(candidate, &model).unwrap();

    let swap_route =
        SwapRoute::from_routes(vec![route.clone()], TradeType::ExactOutput, &model).unwrap();

    assert_eq!(
        swap_route.quote_gas_adjusted,
        route
            .quote_adjusted_for_gas()
            .add(&swap_route.l1.cost_l1_quote)
            .unwrap()
    );
    assert!(swap_route.quote_gas_adjusted > *route.quote_adjusted_for_gas());
}

#[test]
fn swap_routes_need_one_trade_type() {
    let (weth, usdc) = (optimism::weth(), optimism::usdc());
    let model = model(Chain::Optimism, weth.clone(), usdc.clone(), fixtures::op_constants());
    let route = sell(&model, &weth, &usdc, 10);
    assert!(SwapRoute::from_routes(vec![], TradeType::ExactInput, &model).is_err());
    assert!(SwapRoute::from_routes(vec![route], TradeType::ExactOutput, &model).is_err());
}
