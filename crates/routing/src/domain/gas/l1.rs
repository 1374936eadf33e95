//! Offline replica of the rollup gas price oracles that charge for posting
//! a transaction's call data to L1.
//!
//! This is a heuristic: it scans the serialized call data the way the
//! oracles do and applies the constants fetched for the current session.
//! Any change to the oracle contracts silently invalidates it.

use {
    crate::domain::eth::{Gas, U256},
    chain::L1DataFee,
    serde::Deserialize,
};

/// Constants read from the chain's gas price oracle once per session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum L2GasConstants {
    OpStack {
        l1_base_fee: U256,
        scalar: U256,
        decimals: u32,
        overhead: U256,
    },
    Arbitrum {
        per_l2_tx_fee: U256,
        per_l1_calldata_fee: U256,
    },
}

/// Largest OP stack `decimals` whose power of ten still fits into a `U256`.
pub const MAX_OP_STACK_DECIMALS: u32 = 77;

impl L2GasConstants {
    pub fn family(&self) -> L1DataFee {
        match self {
            Self::OpStack { .. } => L1DataFee::OpStack,
            Self::Arbitrum { .. } => L1DataFee::Arbitrum,
        }
    }
}

/// L1 gas charged per call data byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DataWeights {
    pub zero_byte: u64,
    pub non_zero_byte: u64,
    /// Bytes of the transaction signature, which the oracle counts as non
    /// zero bytes on top of the call data.
    pub signature_bytes: u64,
}

impl Default for DataWeights {
    fn default() -> Self {
        Self {
            zero_byte: 4,
            non_zero_byte: 16,
            signature_bytes: 68,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DataFee {
    pub l1_gas_used: Gas,
    /// In wei of the chain's native token.
    pub fee: U256,
}

/// L1 gas used to post `calldata`, plus a fixed `overhead`.
pub fn l1_gas_used(calldata: &[u8], overhead: U256, weights: &DataWeights) -> Gas {
    let zeros = calldata.iter().filter(|byte| **byte == 0).count();
    let non_zeros = calldata.len() - zeros;
    let zeros = U256::from(zeros) * U256::from(weights.zero_byte);
    let non_zeros = (U256::from(non_zeros) + U256::from(weights.signature_bytes))
        * U256::from(weights.non_zero_byte);
    Gas(zeros.saturating_add(non_zeros).saturating_add(overhead))
}

/// The L1 data fee the oracle would charge for a transaction with the given
/// call data.
pub fn data_fee(calldata: &[u8], constants: &L2GasConstants, weights: &DataWeights) -> DataFee {
    match constants {
        L2GasConstants::OpStack {
            l1_base_fee,
            scalar,
            decimals,
            overhead,
        } => {
            let l1_gas_used = l1_gas_used(calldata, *overhead, weights);
            let scaled = l1_gas_used
                .0
                .checked_mul(*l1_base_fee)
                .and_then(|value| value.checked_mul(*scalar))
                .unwrap_or_else(|| {
                    tracing::warn!(
                        %l1_gas_used,
                        %l1_base_fee,
                        %scalar,
                        "L1 data fee overflows, capping it"
                    );
                    U256::MAX
                });
            let fee = match U256::from(10).checked_pow(U256::from(*decimals)) {
                Some(divisor) => scaled / divisor,
                None => {
                    tracing::warn!(decimals, "L1 fee scalar decimals out of range");
                    U256::zero()
                }
            };
            DataFee { l1_gas_used, fee }
        }
        L2GasConstants::Arbitrum {
            per_l2_tx_fee,
            per_l1_calldata_fee,
        } => {
            let l1_gas_used = l1_gas_used(calldata, U256::zero(), weights);
            let fee = l1_gas_used
                .0
                .saturating_mul(*per_l1_calldata_fee)
                .saturating_add(*per_l2_tx_fee);
            DataFee { l1_gas_used, fee }
        }
    }
}
