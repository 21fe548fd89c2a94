use anyhow::{anyhow, bail, Context};
use ethers::{
    signers::{LocalWallet, Signer},
    types::{transaction::eip2718::TypedTransaction, Address, Bytes, TxHash},
    utils::{hex, keccak256},
};

const PRIVATE_KEY_LEN: usize = 32;

/// The account the transactions are sent from.
pub struct Identity {
    wallet: LocalWallet,
}

// only the address, never the key
impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.address())
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct SignedTransaction {
    /// RLP encoding ready for `eth_sendRawTransaction`.
    pub raw: Bytes,
    pub hash: TxHash,
}

impl Identity {
    pub fn from_hex(private_key: &str) -> anyhow::Result<Self> {
        // plain hex only, the way it is written in the settings file
        if private_key.starts_with("0x") || private_key.starts_with("0X") {
            bail!("Invalid private key: expected hex without a 0x prefix");
        }
        let bytes = hex::decode(private_key).map_err(|e| anyhow!("Invalid private key: {}", e))?;
        if bytes.len() != PRIVATE_KEY_LEN {
            bail!(
                "Failed to parse private key: expected {} bytes, got {}",
                PRIVATE_KEY_LEN,
                bytes.len()
            );
        }

        let wallet = LocalWallet::from_bytes(&bytes)
            .map_err(|e| anyhow!("Failed to parse private key: {}", e))?;

        Ok(Self { wallet })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Signs with EIP-155 replay protection. The chain id comes from the transaction
    /// itself, so the result depends only on the transaction fields and the key.
    pub fn sign(&self, tx: &TypedTransaction) -> anyhow::Result<SignedTransaction> {
        let signature = self
            .wallet
            .sign_transaction_sync(tx)
            .context("Failed to sign transaction")?;

        let raw = tx.rlp_signed(&signature);
        let hash = TxHash::from(keccak256(&raw));

        Ok(SignedTransaction { raw, hash })
    }
}

#[cfg(test)]
mod tests {
    use ethers::{
        types::{Transaction, U256},
        utils::rlp,
    };

    use super::*;
    use crate::transaction::PlayTransaction;

    const ANVIL_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn play_tx(nonce: u64, chain_id: u64) -> TypedTransaction {
        PlayTransaction {
            nonce: U256::from(nonce),
            to: "0x1f9E8d3E2bCc0E6a9C5bD6C4F3F5Ae2E5e4D1c3B".parse().unwrap(),
            gas_limit: 56_000,
            gas_price: U256::from(60_000_000_000_u64),
            chain_id,
        }
        .to_typed()
    }

    #[test]
    fn derives_known_addresses() {
        let identity = Identity::from_hex(ANVIL_KEY).unwrap();
        assert_eq!(
            identity.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );

        let identity =
            Identity::from_hex("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318")
                .unwrap();
        assert_eq!(
            identity.address(),
            "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn address_derivation_is_stable() {
        let first = Identity::from_hex(ANVIL_KEY).unwrap().address();
        let second = Identity::from_hex(ANVIL_KEY).unwrap().address();

        assert_eq!(first, second);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(Identity::from_hex("not hex at all").is_err());
        assert!(Identity::from_hex("abc").is_err());
        assert!(Identity::from_hex("deadbeef").is_err());
        assert!(Identity::from_hex(&"00".repeat(32)).is_err());
        assert!(Identity::from_hex(&"ff".repeat(32)).is_err());
    }

    #[test]
    fn rejects_prefixed_or_padded_keys() {
        let prefixed = format!("0x{}", ANVIL_KEY);
        let err = Identity::from_hex(&prefixed).unwrap_err();
        assert!(err.to_string().contains("Invalid private key"), "{err}");
        assert!(Identity::from_hex(&format!("0X{}", ANVIL_KEY)).is_err());

        assert!(Identity::from_hex(&format!(" {} ", ANVIL_KEY)).is_err());
        assert!(Identity::from_hex(&format!("{}\n", ANVIL_KEY)).is_err());
    }

    #[test]
    fn signing_is_deterministic() {
        let identity = Identity::from_hex(ANVIL_KEY).unwrap();
        let tx = play_tx(7, 1);

        let first = identity.sign(&tx).unwrap();
        let second = identity.sign(&tx).unwrap();

        assert_eq!(first.raw, second.raw);
        assert_eq!(first.hash, second.hash);
    }

    #[test]
    fn signed_transaction_round_trips_through_rlp() {
        let identity = Identity::from_hex(ANVIL_KEY).unwrap();
        let signed = identity.sign(&play_tx(3, 1)).unwrap();

        let decoded: Transaction = rlp::decode(&signed.raw).unwrap();

        assert_eq!(decoded.hash, signed.hash);
        assert_eq!(decoded.recover_from().unwrap(), identity.address());
        assert_eq!(decoded.nonce, U256::from(3));
        assert_eq!(decoded.gas, U256::from(56_000));
        assert_eq!(decoded.gas_price, Some(U256::from(60_000_000_000_u64)));
        assert_eq!(decoded.value, U256::zero());
        assert!(decoded.input.is_empty());
        // EIP-155: v = recovery id + 35 + 2 * chain id
        assert!([37, 38].contains(&decoded.v.as_u64()));
    }

    #[test]
    fn chain_id_is_bound_into_the_signature() {
        let identity = Identity::from_hex(ANVIL_KEY).unwrap();

        let mainnet = identity.sign(&play_tx(0, 1)).unwrap();
        let other = identity.sign(&play_tx(0, 10_143)).unwrap();
        assert_ne!(mainnet.hash, other.hash);

        let decoded: Transaction = rlp::decode(&other.raw).unwrap();
        let v = decoded.v.as_u64();
        assert!(v == 10_143 * 2 + 35 || v == 10_143 * 2 + 36);
    }
}
