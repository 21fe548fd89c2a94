use std::{convert::TryFrom, sync::Arc};

use anyhow::{anyhow, Context};
use ethers::abi::{parse_abi, Abi};
use ethers::prelude::*;
use log::debug;

/// The JSON-RPC surface the play loop needs.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    async fn chain_id(&self) -> anyhow::Result<u64>;

    /// Balance in wei at the latest block.
    async fn get_balance(&self, address: Address) -> anyhow::Result<U256>;

    /// Next nonce for `address`, counting transactions still in the mempool.
    async fn get_pending_nonce(&self, address: Address) -> anyhow::Result<U256>;

    /// Broadcasts a signed transaction and returns its hash without waiting for a receipt.
    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<TxHash>;

    /// `(wins, losses)` recorded by the game contract for `player`.
    async fn get_score(&self, contract: Address, player: Address) -> anyhow::Result<(U256, U256)>;
}

pub struct RpcClient {
    provider: Provider<Http>,
    game_abi: Abi,
}

impl RpcClient {
    pub fn new(rpc_url: &str) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("Invalid RPC URL {:?}", rpc_url))?;
        let game_abi = parse_abi(&[
            "function getScore(address _player) external view returns (uint256 _wins, uint256 _losses)",
        ])?;

        Ok(Self { provider, game_abi })
    }
}

impl ChainClient for RpcClient {
    async fn chain_id(&self) -> anyhow::Result<u64> {
        let chain_id = self.provider.get_chainid().await?;

        u64::try_from(chain_id).map_err(|_| anyhow!("Chain id {} does not fit in 64 bits", chain_id))
    }

    async fn get_balance(&self, address: Address) -> anyhow::Result<U256> {
        Ok(self.provider.get_balance(address, None).await?)
    }

    async fn get_pending_nonce(&self, address: Address) -> anyhow::Result<U256> {
        let nonce = self
            .provider
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await?;

        Ok(nonce)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> anyhow::Result<TxHash> {
        // fire and forget, no confirmations
        let pending = self.provider.send_raw_transaction(raw).await?;
        debug!("Broadcast {:?}", pending.tx_hash());

        Ok(pending.tx_hash())
    }

    async fn get_score(&self, contract: Address, player: Address) -> anyhow::Result<(U256, U256)> {
        let client = Arc::new(self.provider.clone());
        let contract = Contract::new(contract, self.game_abi.clone(), client);

        let score = contract
            .method::<_, (U256, U256)>("getScore", player)?
            .call()
            .await?;

        Ok(score)
    }
}
