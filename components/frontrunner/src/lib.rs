pub mod cli;

use std::time::Duration;

use anyhow::Context;
use common::utils::{format_address, format_ether_balance, gwei_to_wei};
use config::Config;
use ethers::types::{Address, TxHash, U256};
use log::{error, info, warn};
use transaction_sender::{ChainClient, Identity, PlayTransaction};

use crate::cli::Args;

/// Everything one play session needs, fixed before the first transaction is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaySettings {
    pub contract_address: Address,
    /// Wei per unit of gas.
    pub gas_price: U256,
    pub gas_limit: u64,
    pub chain_id: u64,
    pub attempts: u64,
    pub interval: Duration,
    pub balance_threshold: U256,
}

impl PlaySettings {
    pub fn new(config: &Config, args: &Args) -> Self {
        Self {
            contract_address: config.contract_address,
            gas_price: gwei_to_wei(args.gas_price_gwei),
            gas_limit: config.gas_limit,
            chain_id: config.chain_id,
            attempts: args.attempts,
            interval: Duration::from_secs(args.interval),
            balance_threshold: config.balance_threshold,
        }
    }

    pub fn transaction(&self, nonce: U256) -> PlayTransaction {
        PlayTransaction {
            nonce,
            to: self.contract_address,
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
            chain_id: self.chain_id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayReport {
    /// Nonce of every attempt, in order, whether or not the send went through.
    pub nonces: Vec<U256>,
    pub sent: Vec<TxHash>,
    pub failures: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InsufficientBalance { balance: U256, threshold: U256 },
    Completed(PlayReport),
}

/// Probes the endpoint and returns the chain id it reports.
///
/// Transactions are always signed for `signing_chain_id`; a mismatch is only reported,
/// since nodes will reject every transaction signed for another chain.
pub async fn check_connection<C: ChainClient>(
    client: &C,
    signing_chain_id: u64,
) -> anyhow::Result<u64> {
    let endpoint_chain_id = client
        .chain_id()
        .await
        .context("Failed to connect to Ethereum network")?;
    info!("Connected to the network (chain id {}).", endpoint_chain_id);

    if endpoint_chain_id != signing_chain_id {
        warn!(
            "Endpoint reports chain id {} but transactions are signed for chain id {}; set CHAIN_ID if this is not intended",
            endpoint_chain_id, signing_chain_id
        );
    }

    Ok(endpoint_chain_id)
}

/// Probes the endpoint, then decodes the key and plays.
///
/// The key is only decoded after the endpoint answered, so a bad endpoint is reported
/// ahead of a bad key.
pub async fn start<C: ChainClient>(
    client: &C,
    config: &Config,
    args: &Args,
) -> anyhow::Result<Outcome> {
    check_connection(client, config.chain_id).await?;

    let identity = Identity::from_hex(&config.private_key)?;
    info!("Using account: {}", format_address(&identity.address()));

    let settings = PlaySettings::new(config, args);
    run(client, &identity, &settings).await
}

pub fn has_sufficient_balance(balance: U256, threshold: U256) -> bool {
    balance >= threshold
}

/// Checks the balance once, fetches the pending nonce and plays `settings.attempts` times.
pub async fn run<C: ChainClient>(
    client: &C,
    identity: &Identity,
    settings: &PlaySettings,
) -> anyhow::Result<Outcome> {
    let address = identity.address();

    let balance = client
        .get_balance(address)
        .await
        .context("Failed to get account balance")?;
    info!("Account balance: {} ETH", format_ether_balance(balance));

    if !has_sufficient_balance(balance, settings.balance_threshold) {
        warn!("Account balance is too low to play. Please add funds.");
        return Ok(Outcome::InsufficientBalance {
            balance,
            threshold: settings.balance_threshold,
        });
    }

    let (wins, losses) = client
        .get_score(settings.contract_address, address)
        .await
        .context("Failed to get score")?;
    info!("Current Score: {} Wins, {} Losses", wins, losses);

    let nonce = client
        .get_pending_nonce(address)
        .await
        .context("Failed to get nonce")?;
    info!("Nonce: {}", nonce);

    let report = play(client, identity, settings, nonce).await?;
    info!(
        "All attempts completed ({} sent, {} failed). Exiting...",
        report.sent.len(),
        report.failures
    );

    Ok(Outcome::Completed(report))
}

/// The send loop. The nonce is tracked locally and advances after every attempt,
/// including failed ones; it is never re-read from the node.
pub async fn play<C: ChainClient>(
    client: &C,
    identity: &Identity,
    settings: &PlaySettings,
    starting_nonce: U256,
) -> anyhow::Result<PlayReport> {
    let mut report = PlayReport::default();
    let mut nonce = starting_nonce;
    let mut remaining = settings.attempts;

    while remaining > 0 {
        let tx = settings.transaction(nonce).to_typed();
        let signed = identity.sign(&tx)?;

        match client.send_raw_transaction(signed.raw).await {
            Ok(hash) => {
                info!("Sent transaction with nonce {}. Tx hash: {:?}", nonce, hash);
                report.sent.push(hash);
            }
            Err(e) => {
                error!("Failed to send transaction with nonce {}: {:#}", nonce, e);
                report.failures += 1;
            }
        }

        report.nonces.push(nonce);
        nonce += U256::one();
        tokio::time::sleep(settings.interval).await;
        remaining -= 1;
    }

    Ok(report)
}
