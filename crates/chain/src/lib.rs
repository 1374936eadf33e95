use {
    serde::{Deserialize, Deserializer, Serialize, Serializer, de},
    strum::EnumIter,
    thiserror::Error,
};

/// Represents each chain the router can price trades on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[repr(u64)]
pub enum Chain {
    Mainnet = 1,
    Optimism = 10,
    Bnb = 56,
    Polygon = 137,
    Base = 8453,
    ArbitrumOne = 42161,
    Celo = 42220,
    CeloAlfajores = 44787,
    Sepolia = 11155111,
}

/// The family of L1 data-posting fee formulas a rollup charges on top of its
/// own execution gas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum L1DataFee {
    /// `l1_gas_used * l1_base_fee * scalar / 10^decimals`, with a fixed
    /// per-transaction overhead folded into `l1_gas_used`.
    OpStack,
    /// `l1_gas_used * per_l1_calldata_fee + per_l2_tx_fee`.
    Arbitrum,
}

impl Chain {
    /// Returns the chain's chain ID
    pub fn id(&self) -> u64 {
        *self as u64
    }

    /// The L1 data fee formula this chain charges, if any.
    pub fn l1_data_fee(&self) -> Option<L1DataFee> {
        match self {
            Self::Optimism | Self::Base => Some(L1DataFee::OpStack),
            Self::ArbitrumOne => Some(L1DataFee::Arbitrum),
            Self::Mainnet
            | Self::Bnb
            | Self::Polygon
            | Self::Celo
            | Self::CeloAlfajores
            | Self::Sepolia => None,
        }
    }
}

impl TryFrom<u64> for Chain {
    type Error = ChainIdNotSupported;

    /// Initializes `Network` from a chain ID, returns error if the chain id is
    /// not supported
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let network = match value {
            x if x == Self::Mainnet as u64 => Self::Mainnet,
            x if x == Self::Optimism as u64 => Self::Optimism,
            x if x == Self::Bnb as u64 => Self::Bnb,
            x if x == Self::Polygon as u64 => Self::Polygon,
            x if x == Self::Base as u64 => Self::Base,
            x if x == Self::ArbitrumOne as u64 => Self::ArbitrumOne,
            x if x == Self::Celo as u64 => Self::Celo,
            x if x == Self::CeloAlfajores as u64 => Self::CeloAlfajores,
            x if x == Self::Sepolia as u64 => Self::Sepolia,
            _ => Err(ChainIdNotSupported(value))?,
        };
        Ok(network)
    }
}

impl Serialize for Chain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.id())
    }
}

impl<'de> Deserialize<'de> for Chain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NetworkVisitor;

        impl de::Visitor<'_> for NetworkVisitor {
            type Value = Chain;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a u64 or a string")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Chain::try_from(value).map_err(de::Error::custom)
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let value = u64::try_from(value).map_err(de::Error::custom)?;
                Chain::try_from(value).map_err(de::Error::custom)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Chain::try_from(value.parse::<u64>().map_err(de::Error::custom)?)
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(NetworkVisitor)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("chain id {0} not supported")]
pub struct ChainIdNotSupported(pub u64);
