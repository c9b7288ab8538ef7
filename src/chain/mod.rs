//! Chain read capability.
//!
//! Discovery and the reward audit only ever issue `eth_call`s. Everything
//! goes through [`ChainReader`] so the RPC client can be swapped for a
//! stubbed chain in tests.

mod rpc;

#[cfg(test)]
pub(crate) mod mock;

pub use rpc::RpcChainReader;

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use thiserror::Error;
use tracing::trace;

use crate::error::{MigrationError, Result};

/// Transport-level failure of a single `eth_call`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CallFailure(pub String);

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute a read-only call and return the raw return data
    async fn eth_call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallFailure>;
}

/// Encode `call`, send it to `to` and decode the typed return value.
///
/// Transport errors, reverts and undecodable returns all surface as
/// [`MigrationError::ChainRead`] tagged with the method signature.
pub async fn read<R, C>(reader: &R, to: Address, call: C) -> Result<C::Return>
where
    R: ChainReader + ?Sized,
    C: SolCall,
{
    let calldata = Bytes::from(call.abi_encode());
    trace!("eth_call {} on {}", C::SIGNATURE, to);

    let output = reader
        .eth_call(to, calldata)
        .await
        .map_err(|e| MigrationError::ChainRead {
            contract: to,
            method: C::SIGNATURE,
            reason: e.to_string(),
        })?;

    C::abi_decode_returns(&output).map_err(|e| MigrationError::ChainRead {
        contract: to,
        method: C::SIGNATURE,
        reason: format!("undecodable return data ({} bytes): {}", output.len(), e),
    })
}
