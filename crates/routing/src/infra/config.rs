//! Configuration file of the routing engine.

use {
    crate::domain::{
        amount::Percent,
        eth::{Gas, H160, U256},
        gas::l1::{DataWeights, L2GasConstants},
        trade::{SubmissionStrategy, SwapOptions},
    },
    anyhow::Context,
    chain::Chain,
    number::serialization::DecimalU256,
    serde::Deserialize,
    serde_with::serde_as,
    std::path::Path,
    tokio::fs,
};

/// Layout revision of the `[l2-gas-constants]` table understood by this
/// build.
const L2_GAS_CONSTANTS_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Config {
    chain_id: Chain,

    #[serde(default = "default_submission_strategy")]
    submission_strategy: SubmissionStrategy,

    #[serde(default = "default_slippage_bps")]
    slippage_bps: u32,

    /// Seconds from the time of building until the transaction expires.
    #[serde(default)]
    deadline_seconds: Option<u64>,

    #[serde(default)]
    additional_gas_overhead: u64,

    #[serde(default)]
    l2_gas_constants: Option<L2GasConstantsConfig>,

    #[serde(default)]
    l1_data_weights: DataWeights,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum L2GasConstantsConfig {
    OpStack(OpStackConstants),
    Arbitrum(ArbitrumConstants),
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct OpStackConstants {
    version: u32,
    #[serde_as(as = "DecimalU256")]
    l1_base_fee: U256,
    #[serde_as(as = "DecimalU256")]
    scalar: U256,
    decimals: u32,
    #[serde_as(as = "DecimalU256")]
    overhead: U256,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ArbitrumConstants {
    version: u32,
    #[serde_as(as = "DecimalU256")]
    per_l2_tx_fee: U256,
    #[serde_as(as = "DecimalU256")]
    per_l1_calldata_fee: U256,
}

impl L2GasConstantsConfig {
    fn version(&self) -> u32 {
        match self {
            Self::OpStack(constants) => constants.version,
            Self::Arbitrum(constants) => constants.version,
        }
    }

    fn into_domain(self) -> L2GasConstants {
        match self {
            Self::OpStack(constants) => L2GasConstants::OpStack {
                l1_base_fee: constants.l1_base_fee,
                scalar: constants.scalar,
                decimals: constants.decimals,
                overhead: constants.overhead,
            },
            Self::Arbitrum(constants) => L2GasConstants::Arbitrum {
                per_l2_tx_fee: constants.per_l2_tx_fee,
                per_l1_calldata_fee: constants.per_l1_calldata_fee,
            },
        }
    }
}

fn default_submission_strategy() -> SubmissionStrategy {
    SubmissionStrategy::SwapRouter02
}

fn default_slippage_bps() -> u32 {
    50
}

/// Validated routing settings.
#[derive(Clone, Debug)]
pub struct Settings {
    pub chain: Chain,
    pub submission_strategy: SubmissionStrategy,
    pub slippage_tolerance: Percent,
    pub deadline_seconds: Option<u64>,
    pub additional_gas_overhead: Gas,
    /// Used when no live source for the constants is available.
    pub l2_gas_constants: Option<L2GasConstants>,
    pub data_weights: DataWeights,
}

impl Settings {
    /// Swap options for a trade built now, paying out to `recipient` (the
    /// caller when `None`).
    pub fn swap_options(&self, recipient: Option<H160>) -> SwapOptions {
        let deadline = self.deadline_seconds.map(|seconds| {
            let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
            U256::from(now.saturating_add(seconds))
        });
        SwapOptions {
            strategy: self.submission_strategy,
            recipient,
            slippage_tolerance: self.slippage_tolerance.clone(),
            deadline,
        }
    }
}

/// Loads the routing settings from a TOML file.
pub async fn load(path: &Path) -> anyhow::Result<Settings> {
    let data = fs::read_to_string(path)
        .await
        .with_context(|| format!("I/O error while reading {path:?}"))?;
    parse(&data).with_context(|| format!("invalid routing configuration {path:?}"))
}

pub fn parse(data: &str) -> anyhow::Result<Settings> {
    let config: Config = toml::de::from_str(data)?;

    let l2_gas_constants = match config.l2_gas_constants {
        Some(constants) => {
            anyhow::ensure!(
                constants.version() == L2_GAS_CONSTANTS_VERSION,
                "unsupported l2-gas-constants version {}, expected {}",
                constants.version(),
                L2_GAS_CONSTANTS_VERSION,
            );
            let constants = constants.into_domain();
            anyhow::ensure!(
                config.chain_id.l1_data_fee() == Some(constants.family()),
                "l2-gas-constants do not match the data fee formula of {:?}",
                config.chain_id,
            );
            Some(constants)
        }
        None => None,
    };

    tracing::debug!(
        chain = ?config.chain_id,
        strategy = %config.submission_strategy,
        slippage_bps = config.slippage_bps,
        has_l2_gas_constants = l2_gas_constants.is_some(),
        "loaded routing configuration"
    );
    Ok(Settings {
        chain: config.chain_id,
        submission_strategy: config.submission_strategy,
        slippage_tolerance: Percent::from_bps(config.slippage_bps),
        deadline_seconds: config.deadline_seconds,
        additional_gas_overhead: Gas::from(config.additional_gas_overhead),
        l2_gas_constants,
        data_weights: config.l1_data_weights,
    })
}
