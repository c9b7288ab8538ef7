use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::error::{MigrationError, Result};

/// A single multisig batch entry. `value` is always `"0"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub to: Address,
    pub value: String,
    pub data: Bytes,
}

impl Transaction {
    #[cfg(test)]
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.get(..4).and_then(|s| s.try_into().ok())
    }
}

/// Encode `call` as a zero-value transaction to `to`.
pub fn encode_call<C: SolCall>(to: Address, call: &C) -> Result<Transaction> {
    if to == Address::ZERO {
        return Err(MigrationError::Encode {
            contract: to,
            method: C::SIGNATURE,
            reason: "target is the zero address".to_string(),
        });
    }

    Ok(Transaction {
        to,
        value: "0".to_string(),
        data: call.abi_encode().into(),
    })
}
