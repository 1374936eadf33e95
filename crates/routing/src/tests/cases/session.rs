//! Quoting sessions against mocked collaborators.

use {
    crate::{
        domain::{
            amount::Amount,
            eth::{GasPrice, Token},
            gas,
            pool::{ConcentratedPool, FeeTier},
            quote::{Candidate, TradeType},
            session::{Error, Providers, Request, Session},
        },
        infra::{
            config::{self, Settings},
            contracts,
            providers::{MockL2GasConstantsProviding, MockPoolProviding},
            tokens,
        },
        tests::fixtures::{self, optimism},
    },
    chain::Chain,
    futures::future::AbortHandle,
    std::sync::Arc,
};

fn pools(chain: Chain, tokens: &[Token]) -> MockPoolProviding {
    let weth = tokens::wrapped_native(chain);
    let mut pools: Vec<ConcentratedPool> = tokens
        .iter()
        .map(|token| fixtures::concentrated_pool(weth, token, FeeTier::Medium, 1_000_000))
        .collect();
    pools.push(fixtures::concentrated_pool(
        weth,
        &tokens::usd_tokens(chain)[0],
        FeeTier::Low,
        5_000_000,
    ));

    let mut provider = MockPoolProviding::new();
    provider.expect_concentrated_pools().returning(move |keys| {
        Ok(pools
            .iter()
            .filter(|pool| keys.iter().any(|key| key.matches(pool)))
            .cloned()
            .collect())
    });
    provider
}

fn l2_constants() -> MockL2GasConstantsProviding {
    let mut provider = MockL2GasConstantsProviding::new();
    provider
        .expect_fetch()
        .times(1)
        .returning(|_| Ok(fixtures::op_constants()));
    provider
}

fn request() -> Request {
    Request {
        chain: Chain::Optimism,
        quote_token: optimism::usdc(),
        amount_token: optimism::weth(),
        gas_price: GasPrice::from_gwei(1),
    }
}

fn settings(data: &str) -> Settings {
    config::parse(data).unwrap()
}

fn candidate(percent: u32) -> Candidate {
    let route = fixtures::concentrated_route(&[optimism::weth(), optimism::usdc()]);
    Candidate {
        route: Arc::new(route),
        amount: Amount::from_raw(optimism::weth(), fixtures::pow10(16) * percent),
        percent,
        quote: Amount::from_raw(optimism::usdc(), 25_000_000 * u64::from(percent)),
        trade_type: TradeType::ExactInput,
        initialized_ticks_crossed: vec![1],
    }
}

#[tokio::test]
async fn prices_and_assembles_on_a_rollup() {
    observe::tracing::initialize(&observe::tracing::Config::default());
    let pools = pools(Chain::Optimism, &[optimism::usdc()]);
    let l2 = l2_constants();
    let settings = settings(
        r#"
        chain-id = 10
        submission-strategy = "universal-router"
        additional-gas-overhead = 1000
        "#,
    );
    let (_handle, registration) = AbortHandle::new_pair();

    let session = Session::prepare(
        request(),
        &settings,
        Providers {
            pools: &pools,
            l2_gas_constants: Some(&l2),
        },
        registration,
    )
    .await
    .unwrap();
    assert_eq!(
        session.gas_model().l2_constants(),
        Some(&fixtures::op_constants())
    );

    let priced = session.price_all(vec![candidate(60), candidate(40), candidate(60)]);
    assert_eq!(priced.len(), 2);
    let routes: Vec<_> = priced.into_iter().map(Result::unwrap).collect();
    // 2000 + 80000 + 31000 plus the configured overhead
    assert_eq!(routes[0].gas_estimate(), 114_000_u64.into());

    let swap_route = session
        .swap_route(routes.clone(), TradeType::ExactInput)
        .unwrap();
    assert!(!swap_route.l1.cost_l1_quote.is_zero());

    let (trade, parameters) = session
        .build_trade(&routes, &settings.swap_options(None))
        .unwrap();
    assert_eq!(trade.swaps().len(), 2);
    assert_eq!(
        Some(parameters.to),
        contracts::universal_router(Chain::Optimism)
    );
}

#[tokio::test]
async fn large_batches_keep_their_order() {
    let pools = pools(Chain::Optimism, &[optimism::usdc()]);
    let l2 = l2_constants();
    let (_handle, registration) = AbortHandle::new_pair();
    let session = Session::prepare(
        request(),
        &settings("chain-id = 10"),
        Providers {
            pools: &pools,
            l2_gas_constants: Some(&l2),
        },
        registration,
    )
    .await
    .unwrap();

    let priced = session.price_all((1..=100).map(candidate).collect());

    let percents: Vec<_> = priced
        .into_iter()
        .map(|route| route.unwrap().percent())
        .collect();
    assert_eq!(percents, (1..=100).collect::<Vec<_>>());
}

#[tokio::test]
async fn configured_constants_are_the_fallback() {
    let pools = pools(Chain::Optimism, &[optimism::usdc()]);
    let settings = settings(
        r#"
        chain-id = 10

        [l2-gas-constants]
        version = 1
        l1-base-fee = "30000000000"
        scalar = "684000"
        decimals = 6
        overhead = "188"
        "#,
    );
    let (_handle, registration) = AbortHandle::new_pair();

    let session = Session::prepare(
        request(),
        &settings,
        Providers {
            pools: &pools,
            l2_gas_constants: None,
        },
        registration,
    )
    .await
    .unwrap();
    assert_eq!(
        session.gas_model().l2_constants(),
        Some(&fixtures::op_constants())
    );

    let (_handle, registration) = AbortHandle::new_pair();
    let result = Session::prepare(
        request(),
        &self::settings("chain-id = 10"),
        Providers {
            pools: &pools,
            l2_gas_constants: None,
        },
        registration,
    )
    .await;
    assert!(matches!(
        result,
        Err(Error::Gas(gas::Error::MissingL2GasConstants(Chain::Optimism)))
    ));
}

#[tokio::test]
async fn collaborator_failures_are_fatal() {
    observe::tracing::initialize(&observe::tracing::Config::default());
    let pools = pools(Chain::Optimism, &[optimism::usdc()]);
    let mut l2 = MockL2GasConstantsProviding::new();
    l2.expect_fetch()
        .returning(|_| Err(anyhow::anyhow!("oracle unreachable")));
    let (_handle, registration) = AbortHandle::new_pair();
    let result = Session::prepare(
        request(),
        &settings("chain-id = 10"),
        Providers {
            pools: &pools,
            l2_gas_constants: Some(&l2),
        },
        registration,
    )
    .await;
    assert!(matches!(result, Err(Error::L2GasConstants(_))));

    // No USD reference pool.
    let mut empty = MockPoolProviding::new();
    empty
        .expect_concentrated_pools()
        .returning(|_| Ok(Vec::new()));
    let mut l2 = MockL2GasConstantsProviding::new();
    l2.expect_fetch()
        .returning(|_| Ok(fixtures::op_constants()));
    let (_handle, registration) = AbortHandle::new_pair();
    let result = Session::prepare(
        request(),
        &settings("chain-id = 10"),
        Providers {
            pools: &empty,
            l2_gas_constants: Some(&l2),
        },
        registration,
    )
    .await;
    assert!(matches!(result, Err(Error::Pricing(_))));
}

#[tokio::test]
async fn non_rollups_skip_the_l2_oracle() {
    let mainnet = fixtures::mainnet::usdc();
    let pools = pools(Chain::Mainnet, &[mainnet.clone()]);
    let mut l2 = MockL2GasConstantsProviding::new();
    l2.expect_fetch().never();
    let (_handle, registration) = AbortHandle::new_pair();

    let session = Session::prepare(
        Request {
            chain: Chain::Mainnet,
            quote_token: mainnet,
            amount_token: fixtures::eth(),
            gas_price: GasPrice::from_gwei(20),
        },
        &settings("chain-id = 1"),
        Providers {
            pools: &pools,
            l2_gas_constants: Some(&l2),
        },
        registration,
    )
    .await
    .unwrap();
    assert_eq!(session.gas_model().l2_constants(), None);
}

#[tokio::test]
async fn aborted_sessions_are_cancelled() {
    let pools = pools(Chain::Optimism, &[optimism::usdc()]);
    let mut l2 = MockL2GasConstantsProviding::new();
    l2.expect_fetch().never();
    let (handle, registration) = AbortHandle::new_pair();
    handle.abort();

    let result = Session::prepare(
        request(),
        &settings("chain-id = 10"),
        Providers {
            pools: &pools,
            l2_gas_constants: Some(&l2),
        },
        registration,
    )
    .await;
    assert!(matches!(result, Err(Error::Cancelled)));
}

#[tokio::test]
async fn requests_for_another_chain_are_rejected() {
    let mut pools = MockPoolProviding::new();
    pools.expect_concentrated_pools().never();
    let settings = settings(
        r#"
        chain-id = 10

        [l2-gas-constants]
        version = 1
        l1-base-fee = "30000000000"
        scalar = "684000"
        decimals = 6
        overhead = "188"
        "#,
    );
    let (_handle, registration) = AbortHandle::new_pair();

    let result = Session::prepare(
        Request {
            chain: Chain::Base,
            quote_token: tokens::usd_tokens(Chain::Base)[0].clone(),
            amount_token: tokens::wrapped_native(Chain::Base).clone(),
            gas_price: GasPrice::from_gwei(1),
        },
        &settings,
        Providers {
            pools: &pools,
            l2_gas_constants: None,
        },
        registration,
    )
    .await;
    assert!(matches!(
        result,
        Err(Error::ChainMismatch {
            settings: Chain::Optimism,
            request: Chain::Base,
        })
    ));
}
