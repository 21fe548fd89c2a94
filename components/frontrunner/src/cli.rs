use std::path::PathBuf;

use clap::Parser;
use common::utils::{DEFAULT_ATTEMPTS, DEFAULT_GAS_PRICE_GWEI, DEFAULT_INTERVAL_SECS};
use config::DEFAULT_SETTINGS_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "frontrunner",
    version,
    about = "Plays the Frontrunner contract by repeatedly sending it zero-value transactions"
)]
pub struct Args {
    /// Set the gas price in GWEI.
    #[arg(long = "gas_price_gwei", default_value_t = DEFAULT_GAS_PRICE_GWEI)]
    pub gas_price_gwei: u64,

    /// Number of attempts to play.
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: u64,

    /// Delay between attempts in seconds.
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval: u64,

    /// Settings file holding RPC_URL, PRIVATE_KEY and FRONTRUNNER_CONTRACT_ADDRESS.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,
}
