use ethers::types::{transaction::eip2718::TypedTransaction, Address, TransactionRequest, U256};

/// A zero-value legacy transaction to the game contract with empty calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayTransaction {
    pub nonce: U256,
    pub to: Address,
    pub gas_limit: u64,
    /// Wei per unit of gas.
    pub gas_price: U256,
    pub chain_id: u64,
}

impl PlayTransaction {
    pub fn to_typed(&self) -> TypedTransaction {
        TransactionRequest::new()
            .nonce(self.nonce)
            .to(self.to)
            .value(U256::zero())
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .chain_id(self.chain_id)
            .into()
    }
}
