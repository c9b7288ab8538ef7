//! JSON-RPC implementation of [`ChainReader`] over HTTP.

use alloy_primitives::{Address, Bytes};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::{CallFailure, ChainReader};
use crate::error::{MigrationError, Result};

/// Reads contract state through an HTTP RPC endpoint.
///
/// Each call is bounded by `timeout`. There is no retry: a slow or failing
/// endpoint aborts the run instead of producing a partial snapshot.
pub struct RpcChainReader {
    provider: DynProvider,
    timeout: Duration,
}

impl RpcChainReader {
    pub fn connect(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let url = rpc_url
            .parse()
            .map_err(|e| MigrationError::config(format!("invalid RPC_URL {}: {}", rpc_url, e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();
        debug!("RPC reader ready (timeout {:?})", timeout);

        Ok(Self { provider, timeout })
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn eth_call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallFailure> {
        let tx = TransactionRequest::default().to(to).input(calldata.into());

        match tokio::time::timeout(self.timeout, self.provider.call(tx)).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(CallFailure(format!("eth_call failed: {}", e))),
            Err(_) => Err(CallFailure(format!("eth_call timed out after {:?}", self.timeout))),
        }
    }
}
