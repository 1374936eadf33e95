//! Router deployments the call data is addressed to.

use {crate::domain::eth::H160, chain::Chain, hex_literal::hex};

/// `SwapRouter02` deployment of a chain.
pub fn swap_router_02(chain: Chain) -> Option<H160> {
    let address = match chain {
        Chain::Mainnet | Chain::Optimism | Chain::ArbitrumOne | Chain::Polygon => {
            hex!("68b3465833fb72A70ecDF485E0e4C7bD8665Fc45")
        }
        Chain::Base => hex!("2626664c2603336E57B271c5C0b26F421741e481"),
        Chain::Bnb => hex!("B971eF87ede563556b2ED4b1C0b0019111Dd85d2"),
        Chain::Celo => hex!("5615CDAb10dc425a742d643d949a7F474C01abc4"),
        Chain::Sepolia => hex!("3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E"),
        Chain::CeloAlfajores => return None,
    };
    Some(H160(address))
}

/// Universal router deployment of a chain.
pub fn universal_router(chain: Chain) -> Option<H160> {
    let address = match chain {
        Chain::Mainnet
        | Chain::Optimism
        | Chain::ArbitrumOne
        | Chain::Polygon
        | Chain::Base
        | Chain::Sepolia => hex!("3fC91A3afd70395Cd496C647d5a6CC9D4B2b7FAD"),
        Chain::Bnb => hex!("4Dae2f939ACf50408e13d58534Ff8c2776d45265"),
        Chain::Celo => hex!("643770E279d5D0733F21d6DC03A8efbABf3255B4"),
        Chain::CeloAlfajores => return None,
    };
    Some(H160(address))
}
