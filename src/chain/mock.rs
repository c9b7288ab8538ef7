//! Stubbed chain for unit tests.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{CallFailure, ChainReader};

enum Stub {
    Return(Bytes),
    Fail(String),
}

/// Answers `eth_call`s from `(contract, calldata)` stubs and records every
/// call it receives. Unstubbed calls fail like a revert would.
#[derive(Default)]
pub struct MockChain {
    stubs: HashMap<(Address, Bytes), Stub>,
    calls: Mutex<Vec<(Address, Bytes)>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<C: SolCall, V: SolValue>(&mut self, to: Address, call: C, ret: V) -> &mut Self {
        self.stubs.insert(
            (to, Bytes::from(call.abi_encode())),
            Stub::Return(Bytes::from(ret.abi_encode())),
        );
        self
    }

    pub fn fail<C: SolCall>(&mut self, to: Address, call: C, reason: &str) -> &mut Self {
        self.stubs.insert(
            (to, Bytes::from(call.abi_encode())),
            Stub::Fail(reason.to_string()),
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of recorded calls to `to` using `C`'s selector
    pub fn calls_to<C: SolCall>(&self, to: Address) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(addr, data)| *addr == to && data.starts_with(&C::SELECTOR))
            .count()
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn eth_call(&self, to: Address, calldata: Bytes) -> Result<Bytes, CallFailure> {
        self.calls.lock().unwrap().push((to, calldata.clone()));

        match self.stubs.get(&(to, calldata)) {
            Some(Stub::Return(out)) => Ok(out.clone()),
            Some(Stub::Fail(reason)) => Err(CallFailure(reason.clone())),
            None => Err(CallFailure("execution reverted".to_string())),
        }
    }
}
