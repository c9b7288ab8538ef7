//! Governance relay
//!
//! The locker only accepts calls from its governance (the old strategy),
//! and the old strategy only accepts `execute` from the voter. A locker
//! action therefore travels voter -> old strategy -> locker, each hop being
//! an `execute(to, 0, data)` wrapping the next one.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use super::transaction::{encode_call, Transaction};
use crate::contracts::{ILocker, IOldStrategy, IVoterExecutor};
use crate::error::Result;

/// Calls the migration makes on the locker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockerAction {
    SetStrategy(Address),
    SetGovernance(Address),
}

impl LockerAction {
    pub fn calldata(&self) -> Bytes {
        let data = match *self {
            LockerAction::SetStrategy(strategy) => {
                ILocker::setStrategyCall { _strategy: strategy }.abi_encode()
            }
            LockerAction::SetGovernance(governance) => {
                ILocker::setGovernanceCall { _governance: governance }.abi_encode()
            }
        };
        data.into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GovernanceRelay {
    pub voter: Address,
    pub old_strategy: Address,
    pub locker: Address,
}

impl GovernanceRelay {
    /// Inner hop: old strategy executes `action` on the locker
    pub fn strategy_hop(&self, action: LockerAction) -> IOldStrategy::executeCall {
        IOldStrategy::executeCall {
            to: self.locker,
            value: U256::ZERO,
            data: action.calldata(),
        }
    }

    /// Outer hop: voter executes the strategy hop on the old strategy
    pub fn voter_hop(&self, action: LockerAction) -> IVoterExecutor::executeCall {
        IVoterExecutor::executeCall {
            to: self.old_strategy,
            value: U256::ZERO,
            data: self.strategy_hop(action).abi_encode().into(),
        }
    }

    /// The single top-level transaction, addressed to the voter
    pub fn relay(&self, action: LockerAction) -> Result<Transaction> {
        encode_call(self.voter, &self.voter_hop(action))
    }
}
