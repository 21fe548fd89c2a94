pub mod client;
pub mod signer;
pub mod transaction;

pub use client::{ChainClient, RpcClient};
pub use signer::{Identity, SignedTransaction};
pub use transaction::PlayTransaction;
