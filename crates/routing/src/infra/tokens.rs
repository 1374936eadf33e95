//! Per-chain token tables: the native currency, its wrapped ERC20 and the
//! USD stablecoins accepted as price references.

use {
    crate::domain::eth::{H160, Token, TokenAddress},
    chain::Chain,
    hex_literal::hex,
    std::{collections::HashMap, sync::LazyLock},
    strum::IntoEnumIterator,
};

#[derive(Debug)]
pub struct ChainTokens {
    pub native: Token,
    pub wrapped_native: Token,
    /// Stablecoins in the order they are tried when looking for a USD
    /// reference pool.
    pub usd: Vec<Token>,
}

static TABLE: LazyLock<HashMap<Chain, ChainTokens>> =
    LazyLock::new(|| Chain::iter().map(|chain| (chain, build(chain))).collect());

/// Token table of a chain.
pub fn for_chain(chain: Chain) -> &'static ChainTokens {
    // Indexing cannot fail, the table has an entry for every `Chain`.
    &TABLE[&chain]
}

pub fn native(chain: Chain) -> Token {
    for_chain(chain).native.clone()
}

pub fn wrapped_native(chain: Chain) -> &'static Token {
    &for_chain(chain).wrapped_native
}

pub fn usd_tokens(chain: Chain) -> &'static [Token] {
    &for_chain(chain).usd
}

fn native_marker(chain: Chain, symbol: &str) -> Token {
    Token {
        chain_id: chain.id(),
        address: TokenAddress::Native,
        decimals: 18,
        symbol: symbol.to_string(),
    }
}

fn build(chain: Chain) -> ChainTokens {
    let erc20 = |address: [u8; 20], decimals: u8, symbol: &str| {
        Token::erc20(chain, H160(address), decimals, symbol)
    };
    let weth = |address: [u8; 20]| erc20(address, 18, "WETH");

    match chain {
        Chain::Mainnet => ChainTokens {
            native: native_marker(chain, "ETH"),
            wrapped_native: weth(hex!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2")),
            usd: vec![
                erc20(hex!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"), 6, "USDC"),
                erc20(hex!("dAC17F958D2ee523a2206206994597C13D831ec7"), 6, "USDT"),
                erc20(hex!("6B175474E89094C44Da98b954EedeAC495271d0F"), 18, "DAI"),
            ],
        },
        Chain::Optimism => ChainTokens {
            native: native_marker(chain, "ETH"),
            wrapped_native: weth(hex!("4200000000000000000000000000000000000006")),
            usd: vec![
                erc20(hex!("7F5c764cBc14f9669B88837ca1490cCa17c31607"), 6, "USDC.e"),
                erc20(hex!("0b2C639c533813f4Aa9D7837CAf62653d097Ff85"), 6, "USDC"),
                erc20(hex!("DA10009cBd5D07dd0CeCc66161FC93D7c9000da1"), 18, "DAI"),
                erc20(hex!("94b008aA00579c1307B0EF2c499aD98a8ce58e58"), 6, "USDT"),
            ],
        },
        Chain::ArbitrumOne => ChainTokens {
            native: native_marker(chain, "ETH"),
            wrapped_native: weth(hex!("82aF49447D8a07e3bd95BD0d56f35241523fBab1")),
            usd: vec![
                erc20(hex!("FF970A61A04b1cA14834A43f5dE4533eBDDB5CC8"), 6, "USDC.e"),
                erc20(hex!("af88d065e77c8cC2239327C5EDb3A432268e5831"), 6, "USDC"),
                erc20(hex!("DA10009cBd5D07dd0CeCc66161FC93D7c9000da1"), 18, "DAI"),
                erc20(hex!("Fd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9"), 6, "USDT"),
            ],
        },
        Chain::Polygon => ChainTokens {
            native: native_marker(chain, "MATIC"),
            wrapped_native: erc20(hex!("0d500B1d8E8eF31E21C99d1Db9A6444d3ADf1270"), 18, "WMATIC"),
            usd: vec![
                erc20(hex!("2791Bca1f2de4661ED88A30C99A7a9449Aa84174"), 6, "USDC"),
                erc20(hex!("8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063"), 18, "DAI"),
            ],
        },
        Chain::Base => ChainTokens {
            native: native_marker(chain, "ETH"),
            wrapped_native: weth(hex!("4200000000000000000000000000000000000006")),
            usd: vec![
                erc20(hex!("d9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA"), 6, "USDbC"),
                erc20(hex!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"), 6, "USDC"),
            ],
        },
        Chain::Bnb => ChainTokens {
            native: native_marker(chain, "BNB"),
            wrapped_native: erc20(hex!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c"), 18, "WBNB"),
            usd: vec![
                erc20(hex!("55d398326f99059fF775485246999027B3197955"), 18, "USDT"),
                erc20(hex!("8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d"), 18, "USDC"),
                erc20(hex!("e9e7CEA3DedcA5984780Bafc599bD69ADd087D56"), 18, "BUSD"),
            ],
        },
        // CELO is an ERC20 itself, so the native currency and its "wrapped"
        // form are the same contract.
        Chain::Celo => {
            let celo = erc20(hex!("471EcE3750Da237f93B8E339c536989b8978a438"), 18, "CELO");
            ChainTokens {
                native: celo.clone(),
                wrapped_native: celo,
                usd: vec![
                    erc20(hex!("765DE816845861e75A25fCA122bb6898B8B1282a"), 18, "cUSD"),
                    erc20(hex!("cebA9300f2b948710d2653dD7B07f33A8B32118C"), 6, "USDC"),
                ],
            }
        }
        Chain::CeloAlfajores => {
            let celo = erc20(hex!("F194afDf50B03e69Bd7D057c1Aa9e10c9954E4C9"), 18, "CELO");
            ChainTokens {
                native: celo.clone(),
                wrapped_native: celo,
                usd: vec![erc20(
                    hex!("874069Fa1Eb16D44d622F2e0Ca25eeA172369bC1"),
                    18,
                    "cUSD",
                )],
            }
        }
        Chain::Sepolia => ChainTokens {
            native: native_marker(chain, "ETH"),
            wrapped_native: weth(hex!("fFf9976782d46CC05630D1f6eBAb18b2324d6B14")),
            usd: vec![erc20(
                hex!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
                6,
                "USDC",
            )],
        },
    }
}
