//! Migration Batch Builder
//!
//! Emission order:
//! 1. bootstrap: new strategy becomes the locker's `strategy` (relayed)
//! 2. per pool: vault -> new strategy, reward distributor -> new strategy
//! 3. handover: locker governance -> new strategy (relayed), accept it,
//!    then hand the locker's `strategy` role back to the depositor
//!
//! Bootstrap and handover are only emitted when there is at least one pool.

use alloy_primitives::{Address, U256};
use tracing::{debug, info};

use super::relay::{GovernanceRelay, LockerAction};
use super::transaction::{encode_call, Transaction};
use crate::contracts::{INewStrategy, IRewardDistributor, IVault};
use crate::discovery::PoolDescriptor;
use crate::error::{MigrationError, Result};

/// Fixed addresses for one batch generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationContext {
    pub new_strategy: Address,
    pub old_strategy: Address,
    pub locker: Address,
    pub voter: Address,
    pub depositor: Address,
    /// Reward token whose distributor is repointed on every pool
    pub reward_token: Address,
}

impl MigrationContext {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("new_strategy", self.new_strategy),
            ("old_strategy", self.old_strategy),
            ("locker", self.locker),
            ("voter", self.voter),
            ("depositor", self.depositor),
            ("reward_token", self.reward_token),
        ];
        for (name, address) in fields {
            if address == Address::ZERO {
                return Err(MigrationError::config(format!("{} is the zero address", name)));
            }
        }
        Ok(())
    }

    pub fn relay(&self) -> GovernanceRelay {
        GovernanceRelay {
            voter: self.voter,
            old_strategy: self.old_strategy,
            locker: self.locker,
        }
    }
}

pub struct MigrationBatchBuilder {
    ctx: MigrationContext,
}

impl MigrationBatchBuilder {
    pub fn new(ctx: MigrationContext) -> Result<Self> {
        ctx.validate()?;
        Ok(Self { ctx })
    }

    /// Build the full transaction sequence. Any encode failure aborts.
    pub fn build(&self, descriptors: &[PoolDescriptor]) -> Result<Vec<Transaction>> {
        if descriptors.is_empty() {
            info!("No pools to migrate, nothing to build");
            return Ok(Vec::new());
        }

        let mut transactions = Vec::with_capacity(descriptors.len() * 2 + 4);
        transactions.push(self.bootstrap()?);

        for (i, pool) in descriptors.iter().enumerate() {
            debug!("Pool {}/{}: vault {}", i + 1, descriptors.len(), pool.vault);
            transactions.extend(self.pool_pair(pool)?);
        }

        transactions.extend(self.handover()?);

        info!(
            "Built {} transactions for {} pools",
            transactions.len(),
            descriptors.len()
        );
        Ok(transactions)
    }

    /// Relay `setStrategy(new_strategy)` to the locker
    pub fn bootstrap(&self) -> Result<Transaction> {
        self.ctx
            .relay()
            .relay(LockerAction::SetStrategy(self.ctx.new_strategy))
    }

    pub fn pool_pair(&self, pool: &PoolDescriptor) -> Result<[Transaction; 2]> {
        let vault = encode_call(
            pool.vault,
            &IVault::setCurveStrategyCall {
                _newStrat: self.ctx.new_strategy,
            },
        )?;
        let distributor = encode_call(
            pool.reward_distributor,
            &IRewardDistributor::set_reward_distributorCall {
                _reward_token: self.ctx.reward_token,
                _distributor: self.ctx.new_strategy,
            },
        )?;
        Ok([vault, distributor])
    }

    /// Governance transfer, acceptance, then depositor reassignment
    pub fn handover(&self) -> Result<[Transaction; 3]> {
        let transfer = self
            .ctx
            .relay()
            .relay(LockerAction::SetGovernance(self.ctx.new_strategy))?;

        let accept = encode_call(self.ctx.new_strategy, &INewStrategy::acceptGovernanceCall {})?;

        let reassign = encode_call(
            self.ctx.new_strategy,
            &INewStrategy::executeCall {
                to: self.ctx.locker,
                value: U256::ZERO,
                data: LockerAction::SetStrategy(self.ctx.depositor).calldata(),
            },
        )?;

        Ok([transfer, accept, reassign])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{ILocker, IOldStrategy, IVoterExecutor};
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;

    fn ctx() -> MigrationContext {
        MigrationContext {
            new_strategy: address!("69D61428d089C2F35Bf6a472F540D0F82D1EA2cd"),
            old_strategy: address!("20F1d4Fed24073a9b9d388AfA2735Ac91f079ED6"),
            locker: address!("52f541764E6e90eeBc5c21Ff570De0e2D63766B6"),
            voter: address!("20b22019406Cf990F0569a6161cf30B8e6651dDa"),
            depositor: address!("88C88Aa6a9cedc2aff9b4cA6820292F39cc64026"),
            reward_token: address!("D533a949740bb3306d119CC777fa900bA034cd52"),
        }
    }

    fn pool(tag: u8) -> PoolDescriptor {
        PoolDescriptor {
            gauge: Address::with_last_byte(tag),
            vault: Address::with_last_byte(tag + 1),
            reward_distributor: Address::with_last_byte(tag + 2),
        }
    }

    fn locker_call_via_voter(tx: &Transaction) -> Vec<u8> {
        let outer = IVoterExecutor::executeCall::abi_decode(&tx.data).unwrap();
        let middle = IOldStrategy::executeCall::abi_decode(&outer.data).unwrap();
        middle.data.to_vec()
    }

    #[test]
    fn test_empty_descriptor_list_builds_nothing() {
        let builder = MigrationBatchBuilder::new(ctx()).unwrap();
        assert!(builder.build(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_three_pools_exact_order() {
        let ctx = ctx();
        let (a, b, c) = (pool(0x10), pool(0x20), pool(0x30));
        let txs = MigrationBatchBuilder::new(ctx).unwrap().build(&[a, b, c]).unwrap();

        assert_eq!(txs.len(), 10);

        // bootstrap
        assert_eq!(txs[0].to, ctx.voter);
        let bootstrap = ILocker::setStrategyCall::abi_decode(&locker_call_via_voter(&txs[0])).unwrap();
        assert_eq!(bootstrap._strategy, ctx.new_strategy);

        // per-pool pairs
        for (i, p) in [a, b, c].iter().enumerate() {
            let vault_tx = &txs[1 + 2 * i];
            let rd_tx = &txs[2 + 2 * i];

            assert_eq!(vault_tx.to, p.vault);
            assert_eq!(vault_tx.selector(), Some(IVault::setCurveStrategyCall::SELECTOR));

            assert_eq!(rd_tx.to, p.reward_distributor);
            let call = IRewardDistributor::set_reward_distributorCall::abi_decode(&rd_tx.data).unwrap();
            assert_eq!(call._reward_token, ctx.reward_token);
            assert_eq!(call._distributor, ctx.new_strategy);
        }

        // handover
        assert_eq!(txs[7].to, ctx.voter);
        let transfer = ILocker::setGovernanceCall::abi_decode(&locker_call_via_voter(&txs[7])).unwrap();
        assert_eq!(transfer._governance, ctx.new_strategy);

        assert_eq!(txs[8].to, ctx.new_strategy);
        assert_eq!(txs[8].selector(), Some(INewStrategy::acceptGovernanceCall::SELECTOR));

        assert_eq!(txs[9].to, ctx.new_strategy);
        let reassign = INewStrategy::executeCall::abi_decode(&txs[9].data).unwrap();
        assert_eq!(reassign.to, ctx.locker);
        let inner = ILocker::setStrategyCall::abi_decode(&reassign.data).unwrap();
        assert_eq!(inner._strategy, ctx.depositor);
    }

    #[test]
    fn test_single_pool_gets_bootstrap_and_handover() {
        let txs = MigrationBatchBuilder::new(ctx()).unwrap().build(&[pool(0x10)]).unwrap();
        assert_eq!(txs.len(), 6);
        assert_eq!(txs[0].to, ctx().voter);
        assert_eq!(txs[3].to, ctx().voter);
    }

    #[test]
    fn test_duplicate_descriptors_do_not_move_bootstrap_or_handover() {
        let p = pool(0x10);
        let txs = MigrationBatchBuilder::new(ctx()).unwrap().build(&[p, p, p]).unwrap();

        assert_eq!(txs.len(), 10);
        let voter_positions: Vec<usize> = txs
            .iter()
            .enumerate()
            .filter(|(_, tx)| tx.to == ctx().voter)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(voter_positions, vec![0, 7]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = MigrationBatchBuilder::new(ctx()).unwrap();
        let pools = [pool(0x10), pool(0x40)];

        let first = serde_json::to_vec(&builder.build(&pools).unwrap()).unwrap();
        let second = serde_json::to_vec(&builder.build(&pools).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_vault_aborts_build() {
        let mut broken = pool(0x20);
        broken.vault = Address::ZERO;

        let err = MigrationBatchBuilder::new(ctx())
            .unwrap()
            .build(&[pool(0x10), broken])
            .unwrap_err();
        assert_eq!(err.kind(), "EncodeFailure");
    }

    #[test]
    fn test_zero_context_address_rejected() {
        let mut bad = ctx();
        bad.depositor = Address::ZERO;

        let err = MigrationBatchBuilder::new(bad).err().unwrap();
        assert_eq!(err.kind(), "ConfigurationError");
    }
}
