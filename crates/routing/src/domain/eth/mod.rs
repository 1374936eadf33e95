use {
    crate::infra::tokens,
    chain::Chain,
    derive_more::{Add, Display, From, Into},
    std::{
        fmt,
        hash::{Hash, Hasher},
    },
};

pub use ethereum_types::{H160, U256};

/// Where a token lives: the chain's native currency or an ERC20 contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenAddress {
    Native,
    Erc20(H160),
}

/// A fungible asset descriptor.
///
/// Two tokens are the same asset when they share a chain and an address;
/// decimals and symbol are display metadata and do not take part in
/// comparisons.
#[derive(Clone, Debug)]
pub struct Token {
    pub chain_id: u64,
    pub address: TokenAddress,
    pub decimals: u8,
    pub symbol: String,
}

impl Token {
    pub fn erc20(chain: Chain, address: H160, decimals: u8, symbol: &str) -> Self {
        Self {
            chain_id: chain.id(),
            address: TokenAddress::Erc20(address),
            decimals,
            symbol: symbol.to_string(),
        }
    }

    /// The native currency marker of a chain (ETH, BNB, ...).
    pub fn native(chain: Chain) -> Self {
        tokens::native(chain)
    }

    pub fn is_native(&self) -> bool {
        matches!(self.address, TokenAddress::Native)
    }

    /// The contract address of the token, `None` for the native marker.
    pub fn erc20_address(&self) -> Option<H160> {
        match self.address {
            TokenAddress::Native => None,
            TokenAddress::Erc20(address) => Some(address),
        }
    }

    /// The chain this token lives on, if it is one of the supported ones.
    pub fn chain(&self) -> Option<Chain> {
        Chain::try_from(self.chain_id).ok()
    }

    /// Maps the native marker to the chain's wrapped native token. ERC20
    /// tokens (and native markers of unknown chains) are returned as is.
    pub fn wrapped(&self) -> Token {
        match (self.address, self.chain()) {
            (TokenAddress::Native, Some(chain)) => tokens::wrapped_native(chain).clone(),
            _ => self.clone(),
        }
    }

    /// Address used on chain for this token, resolving the native marker to
    /// its wrapped contract.
    pub fn wrapped_address(&self) -> H160 {
        match self.wrapped().address {
            TokenAddress::Erc20(address) => address,
            TokenAddress::Native => H160::zero(),
        }
    }

    /// Whether the token sorts before `other` when both are placed into a
    /// pool, which orders its tokens by address.
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.wrapped_address() < other.wrapped_address()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            TokenAddress::Native => write!(f, "{}(native)", self.symbol),
            TokenAddress::Erc20(address) => write!(f, "{}({address:?})", self.symbol),
        }
    }
}

/// Gas units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, From, Into, Add, Display)]
pub struct Gas(pub U256);

impl From<u64> for Gas {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

/// Price of one gas unit in wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, From, Into, Display)]
pub struct GasPrice(pub U256);

impl GasPrice {
    pub fn from_gwei(gwei: u64) -> Self {
        Self(U256::from(gwei) * U256::exp10(9))
    }
}
