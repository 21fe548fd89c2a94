use anyhow::anyhow;
use ethers::{
    types::{Address, U256},
    utils::{parse_ether, to_checksum},
};
use once_cell::sync::Lazy;

pub const WEI_PER_GWEI: u64 = 1_000_000_000;

pub const DEFAULT_GAS_LIMIT: u64 = 56_000;
pub const DEFAULT_CHAIN_ID: u64 = 1;
pub const DEFAULT_GAS_PRICE_GWEI: u64 = 60;
pub const DEFAULT_ATTEMPTS: u64 = 1;
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// 0.001 ether, the minimum balance required before anything is sent.
pub static DEFAULT_BALANCE_THRESHOLD: Lazy<U256> = Lazy::new(|| U256::exp10(15));

pub fn gwei_to_wei(gwei: u64) -> U256 {
    U256::from(gwei) * U256::from(WEI_PER_GWEI)
}

/// Parses a decimal ether amount such as `0.001` into wei.
pub fn parse_ether_amount(value: &str) -> anyhow::Result<U256> {
    parse_ether(value.trim()).map_err(|e| anyhow!("Invalid ether amount {:?}: {}", value, e))
}

/// Renders wei as ether with six decimals, truncating the remainder.
pub fn format_ether_balance(wei: U256) -> String {
    let one_ether = U256::exp10(18);
    let whole = wei / one_ether;
    let micro = (wei % one_ether) / U256::exp10(12);

    format!("{}.{:06}", whole, micro.as_u64())
}

pub fn format_address(address: &Address) -> String {
    to_checksum(address, None)
}
