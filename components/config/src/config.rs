use std::{env, path::Path, str::FromStr};

use anyhow::{anyhow, Context};
use common::utils::{
    parse_ether_amount, DEFAULT_BALANCE_THRESHOLD, DEFAULT_CHAIN_ID, DEFAULT_GAS_LIMIT,
};
use ethers::types::{Address, U256};

pub const DEFAULT_SETTINGS_FILE: &str = "settings.env";

pub const RPC_URL: &str = "RPC_URL";
pub const PRIVATE_KEY: &str = "PRIVATE_KEY";
pub const FRONTRUNNER_CONTRACT_ADDRESS: &str = "FRONTRUNNER_CONTRACT_ADDRESS";
pub const BALANCE_THRESHOLD: &str = "BALANCE_THRESHOLD";
pub const GAS_LIMIT: &str = "GAS_LIMIT";
pub const CHAIN_ID: &str = "CHAIN_ID";

#[derive(Clone)]
pub struct Config {
    pub rpc_url: String,
    /// Hex string as found in the settings; decoded by the signer.
    pub private_key: String,
    pub contract_address: Address,
    pub balance_threshold: U256,
    pub gas_limit: u64,
    pub chain_id: u64,
}

// keep the key out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("contract_address", &self.contract_address)
            .field("balance_threshold", &self.balance_threshold)
            .field("gas_limit", &self.gas_limit)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

impl Config {
    /// Loads the settings file into the process environment, then reads the config from it.
    /// Variables already set in the environment take precedence over the file.
    pub fn new_from_env(settings_file: impl AsRef<Path>) -> anyhow::Result<Config> {
        let settings_file = settings_file.as_ref();
        dotenv::from_filename(settings_file)
            .with_context(|| format!("Error loading settings file {}", settings_file.display()))?;

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow!("{} is not set", key))
        };

        let rpc_url = required(RPC_URL)?;
        let private_key = required(PRIVATE_KEY)?;
        let contract_address = Address::from_str(&required(FRONTRUNNER_CONTRACT_ADDRESS)?)
            .map_err(|e| anyhow!("{} is not a valid address: {}", FRONTRUNNER_CONTRACT_ADDRESS, e))?;

        let balance_threshold = match lookup(BALANCE_THRESHOLD) {
            Some(value) => parse_ether_amount(&value).context(BALANCE_THRESHOLD)?,
            None => *DEFAULT_BALANCE_THRESHOLD,
        };
        let gas_limit = parse_optional(&lookup, GAS_LIMIT)?.unwrap_or(DEFAULT_GAS_LIMIT);
        let chain_id = parse_optional(&lookup, CHAIN_ID)?.unwrap_or(DEFAULT_CHAIN_ID);

        Ok(Config {
            rpc_url,
            private_key,
            contract_address,
            balance_threshold,
            gas_limit,
            chain_id,
        })
    }
}

fn parse_optional<F>(lookup: &F, key: &str) -> anyhow::Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| anyhow!("{} must be an unsigned integer, got {:?}: {}", key, value, e)),
        None => Ok(None),
    }
}
